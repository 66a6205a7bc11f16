use crate::keywords::canonical_signature;
use crate::line_tag::{classify, DumpFormat, LineTag};
use crate::paths::PathRoots;
use crate::variant::{FileSection, LineRecord, Variant};

/// Pseudo file id of the section opened right after each variant separator.
/// It captures the keyword header and whatever other metadata the host
/// prints before the first real line directive.
pub const DETAILS_SECTION: &str = "Details";

/// Accumulates classified dump lines into [`Variant`]s.
///
/// One pass, no I/O, no suspension points; the caller reads the whole dump
/// into memory first. Lines ahead of the first variant separator are
/// dropped.
pub struct Scanner<'a> {
    format: DumpFormat,
    roots: &'a PathRoots,
    /// Resolved path of the shader's own source file. Line directives with
    /// an empty path and stage markers attribute their sections to it.
    source_shader_path: &'a str,
    variants: Vec<Variant>,
    line_counter: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(format: DumpFormat, roots: &'a PathRoots, source_shader_path: &'a str) -> Self {
        Scanner {
            format,
            roots,
            source_shader_path,
            variants: Vec::new(),
            line_counter: 0,
        }
    }

    pub fn process_lines(&mut self, lines: &[&str]) {
        for index in 0..lines.len() {
            match classify(lines, index, self.format) {
                LineTag::VariantSeparator {
                    global_keywords,
                    local_keywords,
                } => self.begin_variant(global_keywords, local_keywords),
                LineTag::LineDirective {
                    line_number,
                    file_path,
                } => self.apply_line_directive(lines[index], line_number, file_path),
                LineTag::StageMarker { stage } => self.begin_stage_section(stage),
                LineTag::Plain => self.append_plain(lines[index]),
            }
        }
    }

    pub fn into_variants(self) -> Vec<Variant> {
        self.variants
    }

    /// A separator starts a fresh variant; nothing from the previous one is
    /// carried over. The header lines following the separator are not
    /// consumed here; they land in the `Details` section as plain content.
    fn begin_variant(&mut self, global_keywords: &str, local_keywords: Option<&str>) {
        let variant = Variant {
            global_keywords: canonical_signature(global_keywords.split_whitespace()),
            local_keywords: local_keywords
                .map(|keywords| canonical_signature(keywords.split_whitespace())),
            sections: vec![FileSection {
                file_id: DETAILS_SECTION.to_string(),
                display_path: DETAILS_SECTION.to_string(),
                lines: Vec::new(),
            }],
        };
        log::debug!("variant boundary: {}", variant.global_keywords);

        self.line_counter = 0;
        self.variants.push(variant);
    }

    fn apply_line_directive(
        &mut self,
        raw_line: &str,
        line_number: Option<u32>,
        file_path: Option<&str>,
    ) {
        if self.variants.is_empty() {
            return;
        }

        match line_number {
            Some(number) => self.line_counter = number,
            // Unparseable numeric field: keep the previous counter.
            None => log::warn!("malformed line directive {:?}, keeping line counter", raw_line),
        }

        if let Some(path) = file_path {
            let file_id = if path.is_empty() {
                self.source_shader_path.to_string()
            } else {
                path.to_string()
            };
            let display_path = self.roots.normalize(&file_id);

            // The host emits an empty marker line at every section start;
            // the opener record stands in for it and carries the section
            // back-references.
            let opener = LineRecord {
                content: String::new(),
                line_index: self.line_counter,
                section_start: Some(file_id.clone()),
                display_path: Some(display_path.clone()),
                matches_search: true,
            };
            self.push_section(FileSection {
                file_id,
                display_path,
                lines: vec![opener],
            });
        }
    }

    /// Stage sections share file identity with the shader source but show
    /// the stage name instead of a path, and open with a stylized marker
    /// line. The running counter is left alone.
    fn begin_stage_section(&mut self, stage: &str) {
        if self.variants.is_empty() {
            return;
        }

        let file_id = self.source_shader_path.to_string();
        let marker = LineRecord {
            content: format!(">>> {}", stage),
            line_index: 0,
            section_start: Some(file_id.clone()),
            display_path: Some(stage.to_string()),
            matches_search: true,
        };
        self.push_section(FileSection {
            file_id,
            display_path: stage.to_string(),
            lines: vec![marker],
        });
    }

    fn append_plain(&mut self, content: &str) {
        let line_index = self.line_counter;
        let current_section = self
            .variants
            .last_mut()
            .and_then(|variant| variant.sections.last_mut());

        if let Some(section) = current_section {
            let first = section.lines.is_empty();
            section.lines.push(LineRecord {
                content: content.to_string(),
                line_index,
                section_start: if first { Some(section.file_id.clone()) } else { None },
                display_path: if first { Some(section.display_path.clone()) } else { None },
                matches_search: true,
            });
            self.line_counter += 1;
        }
    }

    fn push_section(&mut self, section: FileSection) {
        if let Some(variant) = self.variants.last_mut() {
            variant.sections.push(section);
        }
    }
}
