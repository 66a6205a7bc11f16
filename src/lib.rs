//! **shader-variants** parses the preprocessed text dump a game engine's
//! shader compiler writes next to a shader, and turns it into a queryable
//! model of keyword variants.
//!
//! The dump interleaves every variant of the shader into one flat file: a
//! separator line, the variant's keyword header, then source annotated with
//! `#line` directives. [`parse_dump_str`] scans that text into a list of
//! [`Variant`]s, each carrying its canonical keyword signature and the
//! file sections its source came from. [`VariantIndex`] answers
//! signature lookups and line queries over the result. [`KeywordSet`]
//! tracks the available/selected keywords whose signature drives those
//! lookups.
//!
//! The parsed model is plain owned data: immutable once the parse pass
//! completes, safe to share across threads as a read-only snapshot. To
//! refresh, parse again and swap the whole model; never mutate in place
//! under readers.
//!
//! The dump format is owned by the host and can change between host
//! versions. Anomalies are recovered locally and reported through the
//! [`log`] facade: a malformed directive keeps the previous line counter,
//! a dump without separators parses to an empty list. Only a missing or
//! unreadable dump file surfaces as an error.
//!
//! # Example
//!
//! ```rust
//! use shader_variants::{lines_for, DumpFormat, PathRoots, VariantIndex};
//!
//! let dump = [
//!     shader_variants::VARIANT_SEPARATOR,
//!     "Keywords: FOG_ON",
//!     "#line 1 \"Assets/Water.shader\"",
//!     "float4 _Color;",
//! ]
//! .join("\n");
//!
//! let variants = shader_variants::parse_dump_str(
//!     &dump,
//!     "Assets/Water.shader",
//!     DumpFormat::default(),
//!     &PathRoots::default().with_asset_root("Assets"),
//! );
//!
//! let index = VariantIndex::new(variants);
//! let variant = index.lookup("FOG_ON", None).unwrap();
//! let lines = lines_for(variant, false, None);
//! assert!(lines.iter().any(|line| line.content == "float4 _Color;"));
//! ```

use std::path::Path;

mod error;
mod index;
mod keywords;
mod line_tag;
mod paths;
mod scanner;
mod variant;

pub mod host;
pub mod messages;

#[cfg(test)]
mod tests;

pub use crate::error::DumpError;
pub use crate::index::{lines_for, locate_containing_file, FileLocation, VariantIndex};
pub use crate::keywords::{canonical_signature, KeywordSet, NO_KEYWORDS};
pub use crate::line_tag::{classify, DumpFormat, LineTag, VARIANT_SEPARATOR};
pub use crate::paths::PathRoots;
pub use crate::scanner::{Scanner, DETAILS_SECTION};
pub use crate::variant::{FileSection, LineRecord, Variant};

/// Parse a preprocessed dump already held in memory.
///
/// `source_shader_path` is the resolved path of the shader's own source
/// file; line directives with an empty path attribute their sections to it.
/// Never fails: recoverable anomalies are logged, and a dump without any
/// variant separator yields an empty list.
pub fn parse_dump_str(
    text: &str,
    source_shader_path: &str,
    format: DumpFormat,
    roots: &PathRoots,
) -> Vec<Variant> {
    let lines: Vec<&str> = text.lines().collect();
    let mut scanner = Scanner::new(format, roots, source_shader_path);
    scanner.process_lines(&lines);
    scanner.into_variants()
}

/// Read a preprocessed dump from disk and parse it.
///
/// The file is read fully before any parsing starts; the dump is treated as
/// UTF-8 with lossy replacement of stray bytes. A missing file maps to
/// [`DumpError::MissingDumpFile`], the caller's "no data available" state.
pub fn parse_dump_file(
    path: &Path,
    source_shader_path: &str,
    format: DumpFormat,
    roots: &PathRoots,
) -> Result<Vec<Variant>, DumpError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DumpError::MissingDumpFile {
            path: path.to_path_buf(),
        },
        _ => DumpError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_dump_str(&text, source_shader_path, format, roots))
}
