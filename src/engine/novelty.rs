use crate::feed::types::SearchResult;
use std::collections::HashSet;

/// Links observed so far. Insert-only; remembers first-seen order so the
/// on-disk snapshot is stable across saves.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    index: HashSet<String>,
    order: Vec<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.index.contains(link)
    }

    /// Returns true if the link was not already present.
    pub fn insert(&mut self, link: &str) -> bool {
        if self.index.contains(link) {
            return false;
        }
        self.index.insert(link.to_string());
        self.order.push(link.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Links in first-seen order.
    pub fn links(&self) -> &[String] {
        &self.order
    }
}

impl<S: AsRef<str>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SeenSet::new();
        for link in iter {
            set.insert(link.as_ref());
        }
        set
    }
}

impl PartialEq for SeenSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for SeenSet {}

/// Split a batch into results whose link has not been seen, in input order,
/// and the seen-set extended with those links. A link repeated within the
/// batch only counts as new the first time.
pub fn partition(results: Vec<SearchResult>, mut seen: SeenSet) -> (Vec<SearchResult>, SeenSet) {
    let mut new_results = Vec::new();
    for result in results {
        if seen.insert(&result.link) {
            new_results.push(result);
        }
    }
    (new_results, seen)
}
