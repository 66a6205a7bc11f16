//! Keyword selection state and canonical signatures.
//!
//! A signature is the space-joined, canonically sorted form of a keyword
//! set. Two selections with the same members always produce the same
//! signature, so signatures can be compared as plain strings; this is the
//! lookup key of the variant index.

/// Signature of the empty keyword set.
///
/// The dump itself prints `Keywords: <none>` for keywordless variants, so
/// using the same literal on the selection side lets parsed and produced
/// signatures match without a special case.
pub const NO_KEYWORDS: &str = "<none>";

/// Canonical ordering key: one leading underscore is stripped, comparison
/// is case-sensitive past that. Hosts prefix internal keywords with `_`.
fn sort_key(keyword: &str) -> &str {
    keyword.strip_prefix('_').unwrap_or(keyword)
}

/// Build the canonical signature of a keyword list. Empty tokens and the
/// [`NO_KEYWORDS`] sentinel are ignored; an empty result yields the
/// sentinel. Idempotent, and insensitive to the input order.
pub fn canonical_signature<'a, I>(keywords: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keywords: Vec<&str> = keywords
        .into_iter()
        .filter(|k| !k.is_empty() && *k != NO_KEYWORDS)
        .collect();
    keywords.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));

    if keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        keywords.join(" ")
    }
}

type Observer = Box<dyn FnMut(&str)>;

/// Available and selected keywords for one axis (global or local).
///
/// The selection is kept canonically sorted at all times. Mutating commands
/// return the new signature; an observer, when registered, is invoked with
/// that signature whenever a command actually changes the selection.
#[derive(Default)]
pub struct KeywordSet {
    available: Vec<String>,
    selected: Vec<String>,
    observer: Option<Observer>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Replace the available set wholesale. The selection is pruned to the
    /// intersection; the observer fires only if pruning changed it.
    pub fn set_available<I, S>(&mut self, keywords: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available = keywords.into_iter().map(Into::into).collect();

        let pruned: Vec<String> = self
            .selected
            .iter()
            .filter(|k| self.available.contains(k))
            .cloned()
            .collect();
        self.replace_selection(pruned)
    }

    /// Add one keyword to the selection. No-op if the keyword is not
    /// available or already selected.
    pub fn select(&mut self, keyword: &str) -> String {
        if !self.available.iter().any(|k| k == keyword)
            || self.selected.iter().any(|k| k == keyword)
        {
            return self.signature();
        }

        let mut selected = self.selected.clone();
        selected.push(keyword.to_string());
        self.replace_selection(selected)
    }

    /// Remove one keyword from the selection. No-op if it is not selected.
    pub fn deselect(&mut self, keyword: &str) -> String {
        if !self.selected.iter().any(|k| k == keyword) {
            return self.signature();
        }

        let selected = self
            .selected
            .iter()
            .filter(|k| *k != keyword)
            .cloned()
            .collect();
        self.replace_selection(selected)
    }

    /// Replace the selection from a space-separated signature string.
    /// Members not in the available set are dropped.
    pub fn set_selected(&mut self, signature: &str) -> String {
        let mut selected: Vec<String> = Vec::new();
        for token in signature.split_whitespace() {
            if token != NO_KEYWORDS
                && self.available.iter().any(|k| k == token)
                && !selected.iter().any(|k| k == token)
            {
                selected.push(token.to_string());
            }
        }
        self.replace_selection(selected)
    }

    /// Canonical signature of the current selection.
    pub fn signature(&self) -> String {
        if self.selected.is_empty() {
            NO_KEYWORDS.to_string()
        } else {
            self.selected.join(" ")
        }
    }

    fn replace_selection(&mut self, mut selected: Vec<String>) -> String {
        selected.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));

        let changed = selected != self.selected;
        self.selected = selected;

        let signature = self.signature();
        if changed {
            if let Some(observer) = self.observer.as_mut() {
                observer(&signature);
            }
        }
        signature
    }
}
