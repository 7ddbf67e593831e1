use std::collections::HashMap;

use formfill_suggest::SuggestionItem;

/// Filtered results by exact query text. Lives as long as the page and is
/// never evicted.
#[derive(Debug, Default)]
pub(crate) struct QueryCache {
    entries: HashMap<String, Vec<SuggestionItem>>,
}

impl QueryCache {
    pub(crate) fn get(&self, query: &str) -> Option<Vec<SuggestionItem>> {
        self.entries.get(query).cloned()
    }

    pub(crate) fn insert(&mut self, query: String, items: Vec<SuggestionItem>) {
        self.entries.insert(query, items);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
