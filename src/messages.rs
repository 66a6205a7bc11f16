//! Compiler diagnostics as reported by the host, and the mapping from raw
//! diagnostic text back to keyword signatures.
//!
//! The host's message store tells us which file and line a diagnostic
//! points at, but the variant it belongs to is only encoded in the free-text
//! detail block; its first line reads `Compiling <stage> program with
//! <keywords>`. Recovering a canonical signature from that line is what
//! lets a UI jump from an error straight to the matching variant. The
//! extraction needs `regex` and lives behind the `compiler_messages`
//! feature.

use std::fmt;
use std::path::Path;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// One diagnostic from the host's compiler. A read-only snapshot per query;
/// nothing here is persisted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompilerMessage {
    pub severity: Severity,
    pub platform: String,
    pub source_file: String,
    pub source_line: i32,
    pub summary: String,
    pub detail: String,
}

impl CompilerMessage {
    /// Single-line form for list display: severity, platform, the file's
    /// final path component, line, and the summary text.
    pub fn display_line(&self) -> String {
        let file = Path::new(&self.source_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_file.clone());
        format!(
            "[{}] (on {}): {}:{} - {}",
            self.severity, self.platform, file, self.source_line, self.summary
        )
    }

    /// Canonical signature of the keyword set the diagnosed variant was
    /// compiled with, recovered from the first line of `detail`.
    ///
    /// When the first line does not carry the expected `Compiling ... with`
    /// form it is returned verbatim; feeding that into
    /// [`KeywordSet::set_selected`](crate::KeywordSet::set_selected) is
    /// still safe, since unknown tokens are filtered against the available
    /// set there.
    #[cfg(feature = "compiler_messages")]
    pub fn keyword_signature(&self) -> String {
        lazy_static::lazy_static! {
            static ref COMPILED_WITH_RE: regex::Regex =
                regex::Regex::new(r"^Compiling \w+ program with (.+)$").unwrap();
        }

        let first_line = self.detail.lines().next().unwrap_or("").trim();
        match COMPILED_WITH_RE.captures(first_line) {
            Some(captures) => crate::keywords::canonical_signature(captures[1].split_whitespace()),
            None => first_line.to_string(),
        }
    }
}
