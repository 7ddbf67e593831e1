//! Company autofill keyed by the identifier (IČO) field.
//!
//! Edits are debounced, the identifier is sanitised in place and checked
//! locally first. A checksum-valid identifier is shown as pending until the
//! registry confirms it; only then are the company fields filled and the
//! identifier upgraded to verified. A registry failure leaves it pending.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use formfill_core::{EventOrigin, FieldId, RegistryFields};
use formfill_registry::{
    is_valid_ico, sanitize_ico, CompanyFill, RegistryError, RegistryRecord, ICO_LEN,
    REGISTRY_COUNTRY,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::WidgetContext;
use crate::flight::{Debouncer, Flight};
use crate::source::RegistrySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPhase {
    #[default]
    Idle,
    Debouncing,
    /// Fewer than eight digits; nothing to check yet.
    Incomplete,
    /// Eight digits failing the checksum.
    Invalid,
    Fetching,
    /// Registry data written into the form.
    Filled,
    /// Checksum passed but the registry did not confirm the identifier.
    Unconfirmed,
}

impl LookupPhase {
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, LookupPhase::Debouncing | LookupPhase::Fetching)
    }
}

struct Inner<R> {
    source: R,
    ctx: WidgetContext,
    fields: RegistryFields,
    debounce: Mutex<Debouncer>,
    flight: Mutex<Flight>,
    cache: Mutex<HashMap<String, RegistryRecord>>,
    phase: watch::Sender<LookupPhase>,
}

/// Controller for the company identifier field. Cheap to clone.
pub struct RegistryLookup<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for RegistryLookup<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RegistrySource> RegistryLookup<R> {
    /// Returns `None`, with a warning, when the identifier field is missing.
    pub fn new(
        source: R,
        ctx: WidgetContext,
        fields: RegistryFields,
        debounce: Duration,
    ) -> Option<Self> {
        if !ctx.form.has_field(&fields.ico) {
            tracing::warn!(field = %fields.ico, "company identifier field not found, registry lookup disabled");
            return None;
        }
        Some(Self {
            inner: Arc::new(Inner {
                source,
                ctx,
                fields,
                debounce: Mutex::new(Debouncer::new(debounce)),
                flight: Mutex::new(Flight::default()),
                cache: Mutex::new(HashMap::new()),
                phase: watch::Sender::new(LookupPhase::Idle),
            }),
        })
    }

    #[must_use]
    pub fn field(&self) -> &FieldId {
        &self.inner.fields.ico
    }

    /// The identifier field changed: restart the debounce window.
    pub fn on_input(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .lock_debounce()
            .schedule(move || inner.check());
        self.inner.phase.send_replace(LookupPhase::Debouncing);
    }

    /// Forwards user edits of the identifier field. Runs until aborted.
    pub fn listen(&self) -> JoinHandle<()> {
        let mut events = self.inner.ctx.form.subscribe();
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event)
                        if event.origin == EventOrigin::User
                            && &event.field == this.field() =>
                    {
                        this.on_input();
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "registry lookup fell behind form events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    #[must_use]
    pub fn phase(&self) -> LookupPhase {
        *self.inner.phase.borrow()
    }

    /// Waits until nothing is scheduled or in flight.
    pub async fn settled(&self) -> LookupPhase {
        let mut changes = self.inner.phase.subscribe();
        let phase = changes
            .wait_for(|p| p.is_settled())
            .await
            .map_or(LookupPhase::Idle, |p| *p);
        phase
    }

    #[must_use]
    pub fn cached_records(&self) -> usize {
        self.inner.lock_cache().len()
    }
}

impl<R: RegistrySource> Inner<R> {
    fn lock_debounce(&self) -> MutexGuard<'_, Debouncer> {
        self.debounce.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_flight(&self) -> MutexGuard<'_, Flight> {
        self.flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, RegistryRecord>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: LookupPhase) {
        self.phase.send_replace(phase);
    }

    /// Phase after a fetch completes. A newer edit still waiting on its
    /// debounce keeps the lookup unsettled.
    fn finish_phase(&self, phase: LookupPhase) {
        self.phase.send_if_modified(|current| {
            if *current == LookupPhase::Debouncing {
                return false;
            }
            *current = phase;
            true
        });
    }

    /// Sanitised identifier currently in the field.
    fn current_ico(&self) -> String {
        sanitize_ico(&self.ctx.form.value(&self.fields.ico).unwrap_or_default())
    }

    fn check(self: &Arc<Self>) {
        let field = &self.fields.ico;
        let raw = self.ctx.form.value(field).unwrap_or_default();
        let ico = sanitize_ico(&raw);
        if ico != raw {
            self.ctx.form.normalize(field, &ico);
        }

        let mut flight = self.lock_flight();
        flight.supersede();

        if ico.len() != ICO_LEN {
            self.set_phase(LookupPhase::Incomplete);
            return;
        }
        if !is_valid_ico(&ico) {
            tracing::debug!(ico = %ico, "company identifier failed checksum");
            self.ctx.presenter.mark_invalid(field);
            self.set_phase(LookupPhase::Invalid);
            return;
        }
        self.ctx.presenter.mark_pending_confirmation(field);

        let cached = self.lock_cache().get(&ico).cloned();
        if let Some(record) = cached {
            tracing::debug!(ico = %ico, "registry cache hit");
            let phase = self.consume(&record);
            self.set_phase(phase);
            return;
        }

        self.set_phase(LookupPhase::Fetching);
        let generation = flight.generation();
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = inner.source.lookup(&ico).await;
            inner.finish_fetch(generation, &ico, result);
        });
        flight.launch(0, handle);
    }

    fn finish_fetch(
        &self,
        generation: u64,
        ico: &str,
        result: Result<RegistryRecord, RegistryError>,
    ) {
        let mut flight = self.lock_flight();
        if !flight.settle(generation) {
            return;
        }
        // The field may have been edited while the request was out.
        if self.current_ico() != ico {
            tracing::debug!(ico, "identifier changed, discarding registry response");
            self.finish_phase(LookupPhase::Idle);
            return;
        }

        let phase = match result {
            Ok(record) => {
                self.lock_cache().insert(ico.to_owned(), record.clone());
                self.consume(&record)
            }
            Err(e) if e.is_status() => {
                tracing::warn!(ico, error = %e, "registry did not confirm identifier");
                LookupPhase::Unconfirmed
            }
            Err(e) => {
                tracing::error!(ico, error = %e, "registry request failed");
                LookupPhase::Unconfirmed
            }
        };
        self.finish_phase(phase);
    }

    /// Writes the record into the form. The identifier is only upgraded to
    /// verified when there was something to fill.
    fn consume(&self, record: &RegistryRecord) -> LookupPhase {
        let Some(fill) = CompanyFill::from_record(record) else {
            tracing::warn!("registry record has no legal name, nothing to fill");
            return LookupPhase::Unconfirmed;
        };

        let f = &self.fields;
        for (field, value) in [
            (&f.vat_id, &fill.vat_id),
            (&f.company, &fill.company),
            (&f.street, &fill.street),
            (&f.city, &fill.city),
            (&f.zip, &fill.zip),
        ] {
            self.apply(field.as_ref(), value);
        }
        if let Some(country) = &f.country {
            let form = &self.ctx.form;
            if form.select_by_code(country, fill.country)
                || form.select_by_value(country, REGISTRY_COUNTRY)
            {
                self.ctx.presenter.mark_valid(country);
            }
        }

        self.ctx.presenter.mark_valid(&f.ico);
        LookupPhase::Filled
    }

    fn apply(&self, field: Option<&FieldId>, value: &str) {
        let Some(field) = field else {
            return;
        };
        if !value.is_empty() && self.ctx.form.write(field, value) {
            self.ctx.presenter.mark_valid(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use formfill_core::{Form, Validation};
    use serde_json::json;

    use super::*;
    use crate::testing::{checkout_form, country_options, FakeRegistry};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn acme() -> serde_json::Value {
        json!({
            "ico": "25596641",
            "obchodniJmeno": "Example s.r.o.",
            "dic": "CZ25596641",
            "sidlo": {
                "nazevUlice": "Radlická",
                "cisloDomovni": 3294,
                "nazevObce": "Praha",
                "psc": 15000
            }
        })
    }

    fn lookup(form: &Form, source: FakeRegistry) -> RegistryLookup<FakeRegistry> {
        RegistryLookup::new(
            source,
            WidgetContext::with_form_presenter(form.clone()),
            RegistryFields::default(),
            DEBOUNCE,
        )
        .unwrap()
    }

    async fn enter(form: &Form, lookup: &RegistryLookup<FakeRegistry>, value: &str) -> LookupPhase {
        form.user_edit(lookup.field(), value);
        lookup.on_input();
        lookup.settled().await
    }

    fn value(form: &Form, id: &str) -> String {
        form.value(&FieldId::from(id)).unwrap()
    }

    fn validation(form: &Form, id: &str) -> Validation {
        form.validation(&FieldId::from(id)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_identifier_fills_company_fields() {
        let form = checkout_form();
        let source = FakeRegistry::default().with("25596641", acme());
        let lookup = lookup(&form, source);

        let phase = enter(&form, &lookup, "25596641").await;

        assert_eq!(phase, LookupPhase::Filled);
        assert_eq!(value(&form, "billCompany"), "Example s.r.o.");
        assert_eq!(value(&form, "vatId"), "CZ25596641");
        assert_eq!(value(&form, "billStreet"), "Radlická 3294");
        assert_eq!(value(&form, "billCity"), "Praha");
        assert_eq!(value(&form, "billZip"), "15000");
        assert_eq!(value(&form, "billCountryId"), "1");
        assert_eq!(
            validation(&form, "companyId"),
            Validation::Valid {
                value: "25596641".to_owned()
            }
        );
        assert!(validation(&form, "billZip").is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn separators_are_stripped_in_place() {
        let form = checkout_form();
        let source = FakeRegistry::default().with("25596641", acme());
        let lookup = lookup(&form, source.clone());

        enter(&form, &lookup, "255 966 41").await;

        assert_eq!(value(&form, "companyId"), "25596641");
        assert_eq!(source.calls(), vec!["25596641".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_checksum_is_rejected_without_request() {
        let form = checkout_form();
        let source = FakeRegistry::default();
        let lookup = lookup(&form, source.clone());

        let phase = enter(&form, &lookup, "25596642").await;

        assert_eq!(phase, LookupPhase::Invalid);
        assert_eq!(validation(&form, "companyId"), Validation::Unverified);
        assert!(!form.marker_shown(&FieldId::from("companyId")));
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete_identifier_is_left_alone() {
        let form = checkout_form();
        let source = FakeRegistry::default();
        let lookup = lookup(&form, source.clone());

        assert_eq!(enter(&form, &lookup, "2559").await, LookupPhase::Incomplete);
        assert_eq!(validation(&form, "companyId"), Validation::Unverified);
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_identifier_stays_pending() {
        let form = checkout_form();
        let lookup = lookup(&form, FakeRegistry::default().with_status("27082440", 404));

        let phase = enter(&form, &lookup, "27082440").await;

        assert_eq!(phase, LookupPhase::Unconfirmed);
        assert_eq!(
            validation(&form, "companyId"),
            Validation::PendingConfirmation {
                value: "27082440".to_owned()
            }
        );
        assert!(form.marker_shown(&FieldId::from("companyId")));
        assert_eq!(value(&form, "billCompany"), "");
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_stays_pending_and_is_retried() {
        let form = checkout_form();
        let source = FakeRegistry::default().with_status("00006947", 503);
        let lookup = lookup(&form, source.clone());

        assert_eq!(enter(&form, &lookup, "00006947").await, LookupPhase::Unconfirmed);
        assert_eq!(enter(&form, &lookup, "00006947").await, LookupPhase::Unconfirmed);
        assert_eq!(source.calls().len(), 2);
        assert_eq!(lookup.cached_records(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_identifier_is_served_from_cache() {
        let form = checkout_form();
        let source = FakeRegistry::default().with("25596641", acme());
        let lookup = lookup(&form, source.clone());

        enter(&form, &lookup, "25596641").await;
        enter(&form, &lookup, "2559664").await;
        let phase = enter(&form, &lookup, "25596641").await;

        assert_eq!(phase, LookupPhase::Filled);
        assert_eq!(source.calls().len(), 1);
        assert_eq!(lookup.cached_records(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn country_falls_back_to_option_value() {
        let form = Form::new()
            .with_text_field("companyId")
            .with_text_field("billCompany")
            .with_select(
                "billCountryId",
                vec![
                    formfill_core::SelectOption::new("SK", None),
                    formfill_core::SelectOption::new("CZ", None),
                ],
            );
        let lookup = lookup(&form, FakeRegistry::default().with("25596641", acme()));

        enter(&form, &lookup, "25596641").await;

        assert_eq!(value(&form, "billCountryId"), "CZ");
        assert_eq!(value(&form, "billCompany"), "Example s.r.o.");
    }

    #[tokio::test(start_paused = true)]
    async fn record_without_legal_name_fills_nothing() {
        let form = checkout_form();
        let source = FakeRegistry::default().with("25596641", json!({ "ico": "25596641" }));
        let lookup = lookup(&form, source);

        assert_eq!(enter(&form, &lookup, "25596641").await, LookupPhase::Unconfirmed);
        assert!(matches!(
            validation(&form, "companyId"),
            Validation::PendingConfirmation { .. }
        ));
        assert_eq!(value(&form, "billCountryId"), "");
    }

    #[tokio::test(start_paused = true)]
    async fn listen_reacts_to_identifier_edits_only() {
        let form = checkout_form();
        let source = FakeRegistry::default().with("25596641", acme());
        let lookup = lookup(&form, source.clone());
        let task = lookup.listen();

        form.user_edit(&FieldId::from("billCompany"), "25596641");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(source.calls().is_empty());

        form.user_edit(lookup.field(), "25596641");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(lookup.phase(), LookupPhase::Filled);

        task.abort();
    }

    #[test]
    fn missing_identifier_field_disables_lookup() {
        let form = Form::new().with_select("billCountryId", country_options());
        let lookup = RegistryLookup::new(
            FakeRegistry::default(),
            WidgetContext::with_form_presenter(form),
            RegistryFields::default(),
            DEBOUNCE,
        );
        assert!(lookup.is_none());
    }
}
