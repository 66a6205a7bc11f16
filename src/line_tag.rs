//! Classification of raw dump lines.
//!
//! The dump is a flat text file; every structural marker is a line prefix.
//! Classification never consumes input; a variant separator is only
//! recognized together with the keyword header line(s) that follow it, so
//! `classify` looks ahead at up to two lines past the current one.

/// Separator emitted before every variant block.
pub const VARIANT_SEPARATOR: &str =
    "//////////////////////////////////////////////////////";

/// Keyword header on hosts that report one combined keyword list.
const COMBINED_KEYWORDS_HEADER: &str = "Keywords: ";
/// Keyword headers on hosts that report local keywords separately.
const GLOBAL_KEYWORDS_HEADER: &str = "Global Keywords: ";
const LOCAL_KEYWORDS_HEADER: &str = "Local Keywords: ";

const LINE_DIRECTIVE: &str = "#line ";

const STAGE_MARKER_START: &str = "-- ";
const STAGE_MARKER_INFIX: &str = " shader for ";

/// Capabilities of the host that produced the dump, as far as they change
/// the text format itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DumpFormat {
    /// Hosts with a separate local-keyword axis emit the split
    /// `Global Keywords:` / `Local Keywords:` header pair after each
    /// separator. Newer hosts fold both into a single `Keywords:` line.
    pub separate_local_keywords: bool,
}

/// Tag for one line of the dump.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineTag<'a> {
    /// Start of a new variant block. The keyword header contents are
    /// captured from the following line(s).
    VariantSeparator {
        global_keywords: &'a str,
        local_keywords: Option<&'a str>,
    },

    /// A `#line` directive. `line_number` is `None` when the numeric field
    /// failed to parse; recovery is the builder's call.
    LineDirective {
        line_number: Option<u32>,
        /// `Some("")` means the shader's own source file.
        file_path: Option<&'a str>,
    },

    /// Start of a shader-stage-specific block within the current variant.
    StageMarker { stage: &'a str },

    Plain,
}

/// Classify `lines[index]`, looking ahead as needed.
pub fn classify<'a>(lines: &[&'a str], index: usize, format: DumpFormat) -> LineTag<'a> {
    let line = lines[index];

    if line == VARIANT_SEPARATOR {
        if format.separate_local_keywords {
            if let Some(global) = header_content(lines, index + 1, GLOBAL_KEYWORDS_HEADER) {
                return LineTag::VariantSeparator {
                    global_keywords: global,
                    local_keywords: header_content(lines, index + 2, LOCAL_KEYWORDS_HEADER),
                };
            }
        } else if let Some(global) = header_content(lines, index + 1, COMBINED_KEYWORDS_HEADER) {
            return LineTag::VariantSeparator {
                global_keywords: global,
                local_keywords: None,
            };
        }
        // A separator with no keyword header behind it is not a variant
        // boundary.
    }

    if let Some(rest) = line.strip_prefix(LINE_DIRECTIVE) {
        return match rest.find(' ') {
            Some(space) if space > 0 => LineTag::LineDirective {
                line_number: rest[..space].parse().ok(),
                file_path: Some(rest[space..].trim().trim_matches('"')),
            },
            _ => LineTag::LineDirective {
                line_number: rest.trim().parse().ok(),
                file_path: None,
            },
        };
    }

    if let Some(rest) = line.strip_prefix(STAGE_MARKER_START) {
        if rest.contains(STAGE_MARKER_INFIX) {
            return LineTag::StageMarker {
                stage: rest.trim_matches(|c| c == ':' || c == ' '),
            };
        }
    }

    LineTag::Plain
}

fn header_content<'a>(lines: &[&'a str], index: usize, header: &str) -> Option<&'a str> {
    lines
        .get(index)
        .and_then(|line| line.strip_prefix(header))
        .map(str::trim)
}
