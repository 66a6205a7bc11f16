use indoc::formatdoc;
use pretty_assertions::assert_eq;

use crate::host::{
    dump_file_name, BoxedHostError, ShaderIntrospectionHost, IMPLICIT_GLOBAL_KEYWORDS,
};
use crate::messages::{CompilerMessage, Severity};
use crate::{
    lines_for, parse_dump_file, parse_dump_str, DumpError, DumpFormat, KeywordSet, PathRoots,
    Variant, VariantIndex, DETAILS_SECTION, NO_KEYWORDS, VARIANT_SEPARATOR,
};

const SOURCE_SHADER: &str = "Assets/source.shader";

fn asset_roots() -> PathRoots {
    PathRoots::default().with_asset_root("Assets")
}

fn parse(dump: &str, format: DumpFormat) -> Vec<Variant> {
    parse_dump_str(dump, SOURCE_SHADER, format, &asset_roots())
}

fn parse_combined(dump: &str) -> Vec<Variant> {
    parse(dump, DumpFormat::default())
}

#[test]
fn split_header_dump_builds_sections_and_counters() {
    let dump = formatdoc!(
        r#"
        {sep}
        Global Keywords: FOO BAR
        Local Keywords: <none>
        #line 5 "Assets/a.shader"
        float a1;
        float a2;
        float a3;
        #line 12 "Assets/b.shader"
        float b1;
        float b2;
        "#,
        sep = VARIANT_SEPARATOR
    );

    let variants = parse(
        &dump,
        DumpFormat {
            separate_local_keywords: true,
        },
    );
    assert_eq!(variants.len(), 1);
    let variant = &variants[0];

    assert_eq!(variant.global_keywords, "BAR FOO");
    assert_eq!(variant.local_keywords.as_deref(), Some(NO_KEYWORDS));

    assert_eq!(variant.sections.len(), 3);
    assert_eq!(variant.sections[0].file_id, DETAILS_SECTION);
    assert_eq!(variant.sections[1].file_id, "Assets/a.shader");
    assert_eq!(variant.sections[1].display_path, "a.shader");
    assert_eq!(variant.sections[2].display_path, "b.shader");

    let a_lines: Vec<(String, u32)> = variant.sections[1]
        .lines
        .iter()
        .map(|line| (line.content.clone(), line.line_index))
        .collect();
    assert_eq!(
        a_lines,
        vec![
            ("".to_string(), 5),
            ("float a1;".to_string(), 5),
            ("float a2;".to_string(), 6),
            ("float a3;".to_string(), 7),
        ]
    );

    let b_lines: Vec<(String, u32)> = variant.sections[2]
        .lines
        .iter()
        .map(|line| (line.content.clone(), line.line_index))
        .collect();
    assert_eq!(
        b_lines,
        vec![
            ("".to_string(), 12),
            ("float b1;".to_string(), 12),
            ("float b2;".to_string(), 13),
        ]
    );

    // The keyword header lines land in the details section.
    assert_eq!(variant.sections[0].lines[0].content, "Global Keywords: FOO BAR");

    // Exactly the first record of every section is a section start.
    for section in &variant.sections {
        let starts: Vec<usize> = section
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.section_start.is_some() || line.display_path.is_some())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(starts, vec![0], "in section {}", section.file_id);
    }
}

#[test]
fn lookup_by_signature() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: BAR
        first variant body
        {sep}
        Keywords: FOO BAR
        second variant body
        "#,
        sep = VARIANT_SEPARATOR
    );

    let index = VariantIndex::new(parse_combined(&dump));
    assert_eq!(index.len(), 2);

    let bar = index.lookup("BAR", None).unwrap();
    assert!(bar.records().any(|line| line.content == "first variant body"));

    // Query order does not matter; signatures are canonicalized.
    let both = index.lookup("FOO BAR", None).unwrap();
    assert!(both.records().any(|line| line.content == "second variant body"));
    assert_eq!(both.global_keywords, "BAR FOO");

    assert!(index.lookup("BAZ", None).is_none());
    // The local axis must match too: these variants have none.
    assert!(index.lookup("BAR", Some(NO_KEYWORDS)).is_none());
}

#[test]
fn malformed_line_directive_keeps_the_counter() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        #line 3
        alpha
        #line x "f"
        beta
        gamma
        "#,
        sep = VARIANT_SEPARATOR
    );

    let variants = parse_combined(&dump);
    assert_eq!(variants.len(), 1);
    let variant = &variants[0];

    let records: Vec<(&str, u32)> = variant
        .records()
        .map(|line| (line.content.as_str(), line.line_index))
        .collect();
    assert!(records.contains(&("alpha", 3)));
    // The malformed directive still opened its section, with the counter
    // left where it was.
    assert!(records.contains(&("beta", 4)));
    assert!(records.contains(&("gamma", 5)));

    let section = variant.sections.last().unwrap();
    assert_eq!(section.file_id, "f");
    assert_eq!(section.lines[0].line_index, 4);
}

#[test]
fn collapse_keeps_exactly_the_section_starts() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        #line 1 "Assets/a.shader"
        vec Beta;
        vec gamma;
        #line 1 "Assets/b.shader"
        float BETA2;
        float delta;
        "#,
        sep = VARIANT_SEPARATOR
    );
    let variants = parse_combined(&dump);
    let variant = &variants[0];

    let all = lines_for(variant, false, None);
    let collapsed = lines_for(variant, true, None);

    let expected: Vec<_> = all
        .iter()
        .filter(|line| line.section_start.is_some())
        .cloned()
        .collect();
    assert_eq!(collapsed, expected);
    assert_eq!(collapsed.len(), 3);
}

#[test]
fn search_drops_non_matching_plain_lines() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        #line 1 "Assets/a.shader"
        vec Beta;
        vec gamma;
        #line 1 "Assets/b.shader"
        float BETA2;
        float delta;
        "#,
        sep = VARIANT_SEPARATOR
    );
    let variants = parse_combined(&dump);
    let variant = &variants[0];

    let filtered = lines_for(variant, false, Some("beta"));

    // Retained: 3 section starts plus the two case-insensitive matches.
    assert_eq!(filtered.len(), 5);
    assert!(filtered.iter().all(|line| {
        line.section_start.is_some() || line.content.to_lowercase().contains("beta")
    }));
    assert!(!filtered.iter().any(|line| line.content == "vec gamma;"));

    // Section starts that do not match stay in the result, flagged for
    // dimming rather than dropped.
    let details_start = &filtered[0];
    assert!(details_start.section_start.is_some());
    assert!(!details_start.matches_search);

    // Matching records are flagged.
    assert!(filtered
        .iter()
        .filter(|line| line.section_start.is_none())
        .all(|line| line.matches_search));

    // A blank search term filters nothing.
    assert_eq!(lines_for(variant, false, Some("  ")).len(), 7);
}

#[test]
fn stage_markers_open_sections_on_the_shader_source() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        -- Vertex shader for "d3d11":
        stage body
        "#,
        sep = VARIANT_SEPARATOR
    );
    let variants = parse_combined(&dump);
    let section = variants[0].sections.last().unwrap().clone();

    assert_eq!(section.file_id, SOURCE_SHADER);
    assert_eq!(section.display_path, "Vertex shader for \"d3d11\"");
    assert_eq!(section.lines[0].content, ">>> Vertex shader for \"d3d11\"");
    assert_eq!(section.lines[0].line_index, 0);
    assert_eq!(section.lines[1].content, "stage body");
}

#[test]
fn empty_directive_path_means_the_shader_source() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        #line 1 ""
        Shader "Custom/Source" {{
        "#,
        sep = VARIANT_SEPARATOR
    );
    let variants = parse_combined(&dump);
    let section = variants[0].sections.last().unwrap().clone();

    assert_eq!(section.file_id, SOURCE_SHADER);
    assert_eq!(section.display_path, "source.shader");
}

#[test]
fn lines_before_the_first_separator_are_dropped() {
    let dump = formatdoc!(
        r#"
        stray preamble
        #line 4 "ignored.shader"
        more preamble
        {sep}
        Keywords: FOO
        kept
        "#,
        sep = VARIANT_SEPARATOR
    );
    let variants = parse_combined(&dump);

    assert_eq!(variants.len(), 1);
    assert!(!variants[0].records().any(|line| line.content.contains("preamble")));
    assert!(variants[0].records().any(|line| line.content == "kept"));
}

#[test]
fn no_separators_parse_to_an_empty_set() {
    assert!(parse_combined("just\nsome\ntext").is_empty());
    assert!(parse_combined("").is_empty());
}

#[test]
fn duplicate_signatures_keep_the_later_variant() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        first body
        {sep}
        Keywords: FOO
        second body
        "#,
        sep = VARIANT_SEPARATOR
    );
    let index = VariantIndex::new(parse_combined(&dump));

    assert_eq!(index.len(), 1);
    let variant = index.lookup("FOO", None).unwrap();
    assert!(variant.records().any(|line| line.content == "second body"));
    assert!(!variant.records().any(|line| line.content == "first body"));
}

#[test]
fn refining_variants_are_proper_supersets() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: BAR
        x
        {sep}
        Keywords: FOO BAR
        y
        {sep}
        Keywords: FOO
        z
        "#,
        sep = VARIANT_SEPARATOR
    );
    let index = VariantIndex::new(parse_combined(&dump));

    let refinements = index.refining_variants(&["BAR"]);
    assert_eq!(refinements.len(), 1);
    assert_eq!(refinements[0].global_keywords, "BAR FOO");

    // Everything refines the empty selection.
    assert_eq!(index.refining_variants(&[]).len(), 3);
}

#[test]
fn missing_dump_file_is_a_distinct_state() {
    let missing = std::env::temp_dir().join("shader-variants-definitely-missing.shader");
    match parse_dump_file(&missing, SOURCE_SHADER, DumpFormat::default(), &asset_roots()) {
        Err(DumpError::MissingDumpFile { path }) => assert_eq!(path, missing),
        other => panic!("{:?}", other),
    }
}

#[test]
fn dump_files_round_trip_from_disk() {
    let dump = formatdoc!(
        r#"
        {sep}
        Keywords: FOO
        body
        "#,
        sep = VARIANT_SEPARATOR
    );

    let path = std::env::temp_dir().join(dump_file_name("Test/RoundTrip"));
    std::fs::write(&path, &dump).unwrap();

    let variants =
        parse_dump_file(&path, SOURCE_SHADER, DumpFormat::default(), &asset_roots()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0].global_keywords, "FOO");
}

struct FakeHost {
    globals: Vec<String>,
    messages: Vec<CompilerMessage>,
}

impl ShaderIntrospectionHost for FakeHost {
    fn global_keywords(&self) -> Result<Vec<String>, BoxedHostError> {
        Ok(self.globals.clone())
    }

    fn local_keywords(&self) -> Result<Vec<String>, BoxedHostError> {
        Ok(Vec::new())
    }

    fn variant_count(&self) -> Result<u64, BoxedHostError> {
        Ok(self.globals.len() as u64)
    }

    fn trigger_preprocess(&mut self) -> Result<(), BoxedHostError> {
        Err(anyhow::anyhow!("preprocessing requires a live host").into())
    }

    fn read_messages(&self) -> Result<Vec<CompilerMessage>, BoxedHostError> {
        Ok(self.messages.clone())
    }
}

fn fake_host() -> FakeHost {
    FakeHost {
        globals: vec!["FOG_ON".to_string()],
        messages: vec![CompilerMessage {
            severity: Severity::Warning,
            platform: "d3d11".to_string(),
            source_file: "Assets/source.shader".to_string(),
            source_line: 7,
            summary: "implicit truncation".to_string(),
            detail: "Compiling Fragment program with FOG_ON INSTANCING_ON\nPlatform defines: X"
                .to_string(),
        }],
    }
}

#[test]
fn host_keywords_seed_the_selection_model() {
    let mut host = fake_host();

    let mut available = host.global_keywords().unwrap();
    available.extend(IMPLICIT_GLOBAL_KEYWORDS.iter().map(|k| k.to_string()));

    let mut selection = KeywordSet::new();
    selection.set_available(available);
    assert_eq!(
        selection.available().len(),
        1 + IMPLICIT_GLOBAL_KEYWORDS.len()
    );

    assert_eq!(selection.select("FOG_ON"), "FOG_ON");
    assert_eq!(selection.select("INSTANCING_ON"), "FOG_ON INSTANCING_ON");

    assert_eq!(host.read_messages().unwrap().len(), 1);
    assert!(host.trigger_preprocess().is_err());
}

#[cfg(feature = "compiler_messages")]
#[test]
fn message_keywords_drive_selection() {
    let host = fake_host();
    let messages = host.read_messages().unwrap();
    let message = &messages[0];

    let mut selection = KeywordSet::new();
    let mut available: Vec<String> = host.global_keywords().unwrap();
    available.extend(IMPLICIT_GLOBAL_KEYWORDS.iter().map(|k| k.to_string()));
    selection.set_available(available);

    assert_eq!(
        selection.set_selected(&message.keyword_signature()),
        "FOG_ON INSTANCING_ON"
    );
}
