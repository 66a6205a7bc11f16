//! Queries over the parsed variant set.
//!
//! Everything here is a pure function of the immutable parsed model plus
//! the query parameters; there is no hidden state to invalidate when the
//! selection changes.

use std::collections::{HashMap, HashSet};

use crate::keywords::canonical_signature;
use crate::variant::{LineRecord, Variant};

/// Result of [`locate_containing_file`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileLocation {
    pub file_id: String,
    /// How many earlier sections of the same file precede this one. The
    /// same include can open several sections within one variant; the
    /// occurrence index tells them apart for jump-to-source actions.
    pub occurrence: usize,
    pub line_number: u32,
}

/// Parsed variants, keyed by their canonical signature pair.
pub struct VariantIndex {
    variants: Vec<Variant>,
    by_signature: HashMap<(String, Option<String>), usize>,
}

impl VariantIndex {
    /// Variants are ordered by signature pair for stable presentation.
    /// Signature pairs are unique within the index: should the host ever
    /// emit the same combination twice, the later-parsed variant wins and
    /// the earlier one is dropped with a warning. The sort is stable, so
    /// sorting does not change which one that is.
    pub fn new(mut variants: Vec<Variant>) -> Self {
        variants.sort_by(|a, b| {
            (&a.global_keywords, &a.local_keywords).cmp(&(&b.global_keywords, &b.local_keywords))
        });

        let mut deduped: Vec<Variant> = Vec::with_capacity(variants.len());
        for variant in variants {
            if let Some(previous) = deduped.last() {
                if previous.global_keywords == variant.global_keywords
                    && previous.local_keywords == variant.local_keywords
                {
                    log::warn!(
                        "duplicate variant signature ({}, {:?}), keeping the later one",
                        variant.global_keywords,
                        variant.local_keywords
                    );
                    deduped.pop();
                }
            }
            deduped.push(variant);
        }

        let by_signature = deduped
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                (
                    (variant.global_keywords.clone(), variant.local_keywords.clone()),
                    index,
                )
            })
            .collect();

        VariantIndex {
            variants: deduped,
            by_signature,
        }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Exact lookup by signature pair. Queries are canonicalized first, so
    /// any ordering of the same keywords finds the same variant. Unknown
    /// combinations yield `None`, never an error.
    pub fn lookup(&self, global: &str, local: Option<&str>) -> Option<&Variant> {
        let key = (
            canonical_signature(global.split_whitespace()),
            local.map(|keywords| canonical_signature(keywords.split_whitespace())),
        );
        self.by_signature.get(&key).map(|&index| &self.variants[index])
    }

    /// Variants whose keyword union is a proper superset of `selected`:
    /// the combinations still reachable by adding keywords to the current
    /// selection.
    pub fn refining_variants(&self, selected: &[&str]) -> Vec<&Variant> {
        self.variants
            .iter()
            .filter(|variant| {
                let keywords: HashSet<&str> = variant.keywords().collect();
                keywords.len() > selected.len()
                    && selected.iter().all(|keyword| keywords.contains(keyword))
            })
            .collect()
    }
}

/// Flatten a variant's sections into one renderable line sequence.
///
/// With `collapse_to_sections`, only section-start records survive: one
/// row per file, a table of contents. A non-empty search term marks each
/// record's `matches_search` by case-insensitive substring and drops
/// non-matching plain records; section starts are always retained (possibly
/// with `matches_search == false`, so a caller can dim instead of hide
/// them).
pub fn lines_for(
    variant: &Variant,
    collapse_to_sections: bool,
    search_term: Option<&str>,
) -> Vec<LineRecord> {
    let term = search_term
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    let mut records = Vec::new();
    for record in variant.records() {
        if collapse_to_sections && record.section_start.is_none() {
            continue;
        }

        let mut record = record.clone();
        if let Some(term) = &term {
            record.matches_search = record.content.to_lowercase().contains(term.as_str());
            if !record.matches_search && record.section_start.is_none() {
                continue;
            }
        }
        records.push(record);
    }
    records
}

/// Walk backward from `index` to the nearest section start and report which
/// file the record at `index` belongs to, which occurrence of that file it
/// is, and the record's source line number.
pub fn locate_containing_file(lines: &[LineRecord], index: usize) -> Option<FileLocation> {
    let selected = lines.get(index)?;

    let (section_index, file_id) = lines[..=index]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, record)| record.section_start.clone().map(|file| (i, file)))?;

    let occurrence = lines[..section_index]
        .iter()
        .filter(|record| record.section_start.as_deref() == Some(file_id.as_str()))
        .count();

    Some(FileLocation {
        file_id,
        occurrence,
        line_number: selected.line_index,
    })
}
