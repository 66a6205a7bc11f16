use crate::keywords::NO_KEYWORDS;

/// One physical line of emitted source, along with information pointing back
/// at the origin.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LineRecord {
    /// Raw text of the line.
    pub content: String,

    /// Source line the content came from, per the nearest preceding line
    /// directive.
    pub line_index: u32,

    /// File the owning section came from; set on the first record of a
    /// section only, as a back-reference.
    pub section_start: Option<String>,

    /// Normalized display form of the file path; present only together with
    /// `section_start`.
    pub display_path: Option<String>,

    /// Updated by search queries. True outside of a search.
    pub matches_search: bool,
}

/// Contiguous run of lines attributed to one source file (or pseudo-file)
/// within one variant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileSection {
    /// Path as emitted by the preprocessor, or a virtual name such as the
    /// per-variant details block.
    pub file_id: String,

    /// Normalized form for presentation.
    pub display_path: String,

    pub lines: Vec<LineRecord>,
}

/// One fully keyword-resolved form of the shader.
///
/// Immutable once the parse pass completes; a parsed `Vec<Variant>` can be
/// shared across threads as a read-only snapshot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Variant {
    /// Canonical signature of the global keywords this variant was
    /// preprocessed with.
    pub global_keywords: String,

    /// Canonical signature of the local keywords; absent on hosts that do
    /// not report local keywords separately.
    pub local_keywords: Option<String>,

    pub sections: Vec<FileSection>,
}

impl Variant {
    /// All records of the variant, in section order.
    pub fn records(&self) -> impl Iterator<Item = &LineRecord> {
        self.sections.iter().flat_map(|section| section.lines.iter())
    }

    /// Union of the variant's global and local keyword tokens, sentinel
    /// excluded.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.global_keywords
            .split_whitespace()
            .chain(
                self.local_keywords
                    .as_deref()
                    .unwrap_or("")
                    .split_whitespace(),
            )
            .filter(|token| *token != NO_KEYWORDS)
    }
}
