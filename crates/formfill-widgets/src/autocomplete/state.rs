use formfill_suggest::SuggestionItem;

use crate::flight::Debouncer;

/// Lifecycle of the latest query typed into one street field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
    Rendered,
    Empty,
    Errored,
}

impl QueryPhase {
    /// Nothing is scheduled or outstanding for the field.
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, QueryPhase::Debouncing | QueryPhase::Fetching)
    }
}

/// Keys the street field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Other,
}

/// Mutable per-block state. Highlight is local to the block.
#[derive(Debug)]
pub(crate) struct BlockState {
    pub(crate) debounce: Debouncer,
    pub(crate) results: Vec<SuggestionItem>,
    pub(crate) highlighted: Option<usize>,
    /// Street value written by the last selection.
    pub(crate) last_selected: Option<String>,
    /// Swallow the next query while it equals `last_selected`.
    pub(crate) ignore_until_different: bool,
}

impl BlockState {
    pub(crate) fn new(debounce: Debouncer) -> Self {
        Self {
            debounce,
            results: Vec::new(),
            highlighted: None,
            last_selected: None,
            ignore_until_different: false,
        }
    }

    /// Highlight after ArrowDown, clamped to the last result.
    pub(crate) fn highlight_next(&mut self) -> Option<usize> {
        let last = self.results.len().checked_sub(1);
        self.highlighted = match (self.highlighted, last) {
            (_, None) => None,
            (None, Some(_)) => Some(0),
            (Some(i), Some(last)) => Some((i + 1).min(last)),
        };
        self.highlighted
    }

    /// Highlight after ArrowUp; moving above the first row clears it.
    pub(crate) fn highlight_prev(&mut self) -> Option<usize> {
        self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
        self.highlighted
    }

    pub(crate) fn clear_results(&mut self) {
        self.results.clear();
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn state_with(n: usize) -> BlockState {
        let mut state = BlockState::new(Debouncer::new(Duration::from_millis(1)));
        state.results = (0..n)
            .map(|i| SuggestionItem {
                name: format!("item {i}"),
                location: None,
                zip: None,
                regional_structure: None,
            })
            .collect();
        state
    }

    #[test]
    fn highlight_is_clamped_to_results() {
        let mut state = state_with(2);
        assert_eq!(state.highlight_next(), Some(0));
        assert_eq!(state.highlight_next(), Some(1));
        assert_eq!(state.highlight_next(), Some(1));
        assert_eq!(state.highlight_prev(), Some(0));
        assert_eq!(state.highlight_prev(), None);
        assert_eq!(state.highlight_prev(), None);
    }

    #[test]
    fn no_results_means_no_highlight() {
        let mut state = state_with(0);
        assert_eq!(state.highlight_next(), None);
    }

    #[test]
    fn only_fetching_and_debouncing_are_unsettled() {
        assert!(QueryPhase::Idle.is_settled());
        assert!(QueryPhase::Errored.is_settled());
        assert!(!QueryPhase::Debouncing.is_settled());
        assert!(!QueryPhase::Fetching.is_settled());
    }
}
