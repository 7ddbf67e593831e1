//! The suggestion dropdown under a street field.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use formfill_suggest::{format_location, SuggestionItem};

pub const LOADING_TEXT: &str = "Vyhledávám…";
pub const EMPTY_TEXT: &str = "Žádné výsledky";
pub const ERROR_TEXT: &str = "Chyba načítání";

/// Panels kept by [`SuggestionPanel::history`].
pub const HISTORY_LEN: usize = 16;

/// One rendered suggestion: the display name and a secondary location line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    pub main: String,
    pub secondary: String,
}

impl SuggestionRow {
    #[must_use]
    pub fn from_item(item: &SuggestionItem) -> Self {
        let main = if item.name.trim().is_empty() {
            "—".to_owned()
        } else {
            item.name.clone()
        };
        let secondary = item
            .location
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format_location(item));
        Self { main, secondary }
    }
}

/// Presentation capability the address autocomplete drives.
pub trait SuggestionView: Send + Sync {
    fn show_loading(&self);
    fn show_suggestions(&self, rows: &[SuggestionRow]);
    fn show_empty(&self);
    fn show_error(&self);
    fn hide(&self);
    /// `None` removes the highlight.
    fn highlight(&self, index: Option<usize>);
    /// Moves focus away from the street field.
    fn blur(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Hidden,
    Loading,
    Suggestions(Vec<SuggestionRow>),
    Empty,
    Error,
}

impl Panel {
    /// Info line shown instead of rows, if any.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Panel::Loading => Some(LOADING_TEXT),
            Panel::Empty => Some(EMPTY_TEXT),
            Panel::Error => Some(ERROR_TEXT),
            Panel::Hidden | Panel::Suggestions(_) => None,
        }
    }
}

#[derive(Debug)]
struct PanelState {
    panel: Panel,
    highlighted: Option<usize>,
    focused: bool,
    history: VecDeque<Panel>,
}

/// In-memory [`SuggestionView`]. Records the last [`HISTORY_LEN`] panels it
/// was asked to show.
#[derive(Debug)]
pub struct SuggestionPanel {
    state: Mutex<PanelState>,
}

impl Default for SuggestionPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PanelState {
                panel: Panel::Hidden,
                highlighted: None,
                focused: true,
                history: VecDeque::with_capacity(HISTORY_LEN),
            }),
        }
    }

    #[must_use]
    pub fn panel(&self) -> Panel {
        self.lock().panel.clone()
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.lock().highlighted
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.lock().focused
    }

    /// Recently shown panels, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Panel> {
        self.lock().history.iter().cloned().collect()
    }

    pub fn focus(&self) {
        self.lock().focused = true;
    }

    fn show(&self, panel: Panel) {
        let mut state = self.lock();
        state.highlighted = None;
        if state.history.len() == HISTORY_LEN {
            state.history.pop_front();
        }
        state.history.push_back(panel.clone());
        state.panel = panel;
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SuggestionView for SuggestionPanel {
    fn show_loading(&self) {
        self.show(Panel::Loading);
    }

    fn show_suggestions(&self, rows: &[SuggestionRow]) {
        self.show(Panel::Suggestions(rows.to_vec()));
    }

    fn show_empty(&self) {
        self.show(Panel::Empty);
    }

    fn show_error(&self) {
        self.show(Panel::Error);
    }

    fn hide(&self) {
        self.show(Panel::Hidden);
    }

    fn highlight(&self, index: Option<usize>) {
        self.lock().highlighted = index;
    }

    fn blur(&self) {
        self.lock().focused = false;
    }
}
