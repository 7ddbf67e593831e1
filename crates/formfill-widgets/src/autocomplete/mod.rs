//! Address autocomplete for the street field of each address block.
//!
//! Keystrokes are debounced per field; when the delay expires the query is
//! either dropped (too short), answered from the page-lifetime cache, or
//! fetched. One fetch is outstanding per controller at a time and every new
//! query decision supersedes it. Selecting a suggestion writes street, city,
//! zip and country into the block's fields and marks them verified.

mod cache;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use formfill_core::{
    AddressMapping, AppConfig, EventOrigin, FieldId, UsageCounter, UsageSummary,
};
use formfill_suggest::{filter_by_locality, parse_address, SuggestError, SuggestionItem};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::WidgetContext;
use crate::flight::{Debouncer, Flight};
use crate::source::SuggestSource;
use crate::view::{SuggestionRow, SuggestionView};

use self::cache::QueryCache;
use self::state::BlockState;
pub use self::state::{Key, QueryPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub debounce: Duration,
    /// Trimmed queries shorter than this (in characters) are not searched.
    pub min_query_len: usize,
    /// Country code used when a suggestion names no other country.
    pub home_country: String,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 3,
            home_country: "CZ".to_owned(),
        }
    }
}

impl AutocompleteOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            home_country: config.home_country.clone(),
        }
    }
}

struct Block {
    mapping: AddressMapping,
    view: Arc<dyn SuggestionView>,
    phase: watch::Sender<QueryPhase>,
    state: Mutex<BlockState>,
}

impl Block {
    fn lock(&self) -> MutexGuard<'_, BlockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn phase(&self) -> QueryPhase {
        *self.phase.borrow()
    }

    fn set_phase(&self, phase: QueryPhase) {
        self.phase.send_replace(phase);
    }

    /// Phase after a fetch completes. A newer keystroke still waiting on its
    /// debounce keeps the field unsettled.
    fn finish_phase(&self, phase: QueryPhase) {
        self.phase.send_if_modified(|current| {
            if *current == QueryPhase::Debouncing {
                return false;
            }
            *current = phase;
            true
        });
    }

    /// Another block's query took over this block's fetch. A newer keystroke
    /// here keeps its panel and phase.
    fn abandon_fetch(&self) {
        let mut state = self.lock();
        if self.phase() == QueryPhase::Fetching {
            state.clear_results();
            self.view.hide();
            self.set_phase(QueryPhase::Idle);
        }
    }

    /// Hides the panel; an outstanding schedule or fetch keeps its phase.
    fn close(&self, state: &mut BlockState) {
        state.clear_results();
        self.view.hide();
        if self.phase().is_settled() {
            self.set_phase(QueryPhase::Idle);
        }
    }
}

struct Inner<S> {
    source: S,
    ctx: WidgetContext,
    usage: Arc<UsageCounter>,
    options: AutocompleteOptions,
    blocks: Vec<Block>,
    cache: Mutex<QueryCache>,
    flight: Mutex<Flight>,
}

/// Controller for every address block on the page. Cheap to clone.
pub struct AddressAutocomplete<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for AddressAutocomplete<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SuggestSource> AddressAutocomplete<S> {
    /// Blocks whose street field is missing from the form are skipped.
    pub fn new(
        source: S,
        ctx: WidgetContext,
        usage: Arc<UsageCounter>,
        options: AutocompleteOptions,
        blocks: Vec<(AddressMapping, Arc<dyn SuggestionView>)>,
    ) -> Self {
        let blocks = blocks
            .into_iter()
            .filter(|(mapping, _)| ctx.form.has_field(&mapping.street))
            .map(|(mapping, view)| Block {
                mapping,
                view,
                phase: watch::Sender::new(QueryPhase::Idle),
                state: Mutex::new(BlockState::new(Debouncer::new(options.debounce))),
            })
            .collect();
        Self {
            inner: Arc::new(Inner {
                source,
                ctx,
                usage,
                options,
                blocks,
                cache: Mutex::new(QueryCache::default()),
                flight: Mutex::new(Flight::default()),
            }),
        }
    }

    #[must_use]
    pub fn streets(&self) -> Vec<FieldId> {
        self.inner
            .blocks
            .iter()
            .map(|b| b.mapping.street.clone())
            .collect()
    }

    /// The street field changed: restart its debounce window with the
    /// current, trimmed value.
    pub fn on_input(&self, street: &FieldId) {
        let Some(idx) = self.inner.block_index(street) else {
            return;
        };
        let query = self
            .inner
            .ctx
            .form
            .value(street)
            .unwrap_or_default()
            .trim()
            .to_owned();
        let block = &self.inner.blocks[idx];
        let inner = Arc::clone(&self.inner);
        block
            .lock()
            .debounce
            .schedule(move || inner.run_query(idx, &query));
        block.set_phase(QueryPhase::Debouncing);
    }

    pub fn on_key(&self, street: &FieldId, key: Key) {
        let Some(idx) = self.inner.block_index(street) else {
            return;
        };
        let block = &self.inner.blocks[idx];
        let mut state = block.lock();
        match key {
            Key::ArrowDown => {
                let highlighted = state.highlight_next();
                block.view.highlight(highlighted);
            }
            Key::ArrowUp => {
                let highlighted = state.highlight_prev();
                block.view.highlight(highlighted);
            }
            Key::Enter => {
                if let Some(i) = state.highlighted.filter(|&i| i < state.results.len()) {
                    self.inner.select(idx, &mut state, i);
                }
            }
            Key::Escape => {
                block.close(&mut state);
                block.view.blur();
            }
            Key::Tab => {
                if state.highlighted.is_none() && !state.results.is_empty() {
                    self.inner.select(idx, &mut state, 0);
                }
            }
            Key::Other => {}
        }
    }

    /// A rendered suggestion was clicked.
    pub fn click(&self, street: &FieldId, index: usize) {
        let Some(idx) = self.inner.block_index(street) else {
            return;
        };
        let mut state = self.inner.blocks[idx].lock();
        if index < state.results.len() {
            self.inner.select(idx, &mut state, index);
        }
    }

    /// A click landed outside the block containing `street`.
    pub fn on_click_outside(&self, street: &FieldId) {
        if let Some(idx) = self.inner.block_index(street) {
            let block = &self.inner.blocks[idx];
            block.close(&mut block.lock());
        }
    }

    /// Forwards user edits of street fields from the form's event stream.
    /// Programmatic writes are ignored. Runs until the handle is aborted.
    pub fn listen(&self) -> JoinHandle<()> {
        let mut events = self.inner.ctx.form.subscribe();
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.origin == EventOrigin::User => this.on_input(&event.field),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "autocomplete fell behind form events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    #[must_use]
    pub fn phase(&self, street: &FieldId) -> Option<QueryPhase> {
        let idx = self.inner.block_index(street)?;
        Some(self.inner.blocks[idx].phase())
    }

    #[must_use]
    pub fn phase_changes(&self, street: &FieldId) -> Option<watch::Receiver<QueryPhase>> {
        let idx = self.inner.block_index(street)?;
        Some(self.inner.blocks[idx].phase.subscribe())
    }

    /// Waits until nothing is scheduled or in flight for `street`.
    pub async fn settled(&self, street: &FieldId) -> Option<QueryPhase> {
        let mut changes = self.phase_changes(street)?;
        let phase = changes.wait_for(|p| p.is_settled()).await.ok().map(|p| *p);
        phase
    }

    /// Suggestions currently shown under `street`.
    #[must_use]
    pub fn results(&self, street: &FieldId) -> Vec<SuggestionItem> {
        self.inner
            .block_index(street)
            .map(|idx| self.inner.blocks[idx].lock().results.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn highlighted(&self, street: &FieldId) -> Option<usize> {
        let idx = self.inner.block_index(street)?;
        self.inner.blocks[idx].lock().highlighted
    }

    #[must_use]
    pub fn usage_summary(&self) -> UsageSummary {
        UsageSummary {
            api_calls: self.inner.usage.count(),
            cached_queries: self.inner.lock_cache().len(),
        }
    }
}

impl<S: SuggestSource> Inner<S> {
    fn block_index(&self, street: &FieldId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.mapping.street == street)
    }

    fn lock_cache(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_flight(&self) -> MutexGuard<'_, Flight> {
        self.flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Debounce expired for block `idx`. Lock order: flight, then block.
    fn run_query(self: &Arc<Self>, idx: usize, query: &str) {
        let block = &self.blocks[idx];
        {
            let mut state = block.lock();
            if state.ignore_until_different && state.last_selected.as_deref() == Some(query) {
                block.set_phase(QueryPhase::Idle);
                return;
            }
            state.ignore_until_different = false;
        }

        let mut flight = self.lock_flight();
        if let Some(owner) = flight.supersede() {
            tracing::debug!(street = %self.blocks[owner].mapping.street, "suggest request superseded");
            if owner != idx {
                self.blocks[owner].abandon_fetch();
            }
        }

        if query.chars().count() < self.options.min_query_len {
            block.close(&mut block.lock());
            block.set_phase(QueryPhase::Idle);
            return;
        }

        let cached = self.lock_cache().get(query);
        if let Some(items) = cached {
            tracing::debug!(query, count = items.len(), "suggest cache hit");
            let phase = self.present(idx, items);
            block.set_phase(phase);
            return;
        }

        block.lock().clear_results();
        block.view.show_loading();
        block.set_phase(QueryPhase::Fetching);

        let generation = flight.generation();
        let inner = Arc::clone(self);
        let query = query.to_owned();
        let handle = tokio::spawn(async move {
            let result = inner.source.suggest(&query).await;
            inner.finish_fetch(idx, generation, query, result);
        });
        flight.launch(idx, handle);
    }

    fn finish_fetch(
        &self,
        idx: usize,
        generation: u64,
        query: String,
        result: Result<Vec<SuggestionItem>, SuggestError>,
    ) {
        let mut flight = self.lock_flight();
        if !flight.settle(generation) {
            tracing::debug!(query = %query, "discarding superseded suggest response");
            return;
        }

        match result {
            Ok(items) => {
                self.usage.increment();
                let filtered = filter_by_locality(items, self.source.locality());
                self.lock_cache().insert(query, filtered.clone());
                let phase = self.present(idx, filtered);
                self.blocks[idx].finish_phase(phase);
            }
            Err(e) => {
                tracing::error!(error = %e, query = %query, "suggest request failed");
                let block = &self.blocks[idx];
                block.lock().clear_results();
                block.view.show_error();
                block.finish_phase(QueryPhase::Errored);
            }
        }
    }

    /// Shows `items` (or the no-results line) and returns the matching phase.
    fn present(&self, idx: usize, items: Vec<SuggestionItem>) -> QueryPhase {
        let block = &self.blocks[idx];
        let mut state = block.lock();
        if items.is_empty() {
            state.clear_results();
            block.view.show_empty();
            return QueryPhase::Empty;
        }
        let rows: Vec<SuggestionRow> = items.iter().map(SuggestionRow::from_item).collect();
        state.results = items;
        state.highlighted = None;
        block.view.show_suggestions(&rows);
        QueryPhase::Rendered
    }

    fn select(&self, idx: usize, state: &mut BlockState, index: usize) {
        let block = &self.blocks[idx];
        let map = &block.mapping;
        let form = &self.ctx.form;
        let parsed = parse_address(&state.results[index], &self.options.home_country);

        for (field, value) in [
            (&map.street, &parsed.street),
            (&map.city, &parsed.city),
            (&map.zip, &parsed.zip),
        ] {
            if !value.is_empty() && form.write(field, value) {
                self.ctx.presenter.mark_valid(field);
            }
        }
        if let Some(country) = &map.country {
            if !parsed.country.is_empty() && form.select_by_code(country, &parsed.country) {
                self.ctx.presenter.mark_valid(country);
            }
        }

        tracing::debug!(street = %map.street, value = %parsed.street, "suggestion selected");
        state.last_selected = form.value(&map.street);
        state.ignore_until_different = true;
        state.clear_results();
        block.view.hide();
        block.set_phase(QueryPhase::Idle);
    }
}

#[cfg(test)]
#[path = "autocomplete_test.rs"]
mod tests;
