//! In-memory model of the checkout page's form fields.
//!
//! [`Form`] is a cheap, cloneable handle shared by every widget. It stores
//! each field's value and validation flag and broadcasts a [`FieldEvent`]
//! whenever a value changes, so listeners observe both user edits and the
//! synthetic change notifications that follow a programmatic write.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Identifier of a field on the host page (the element id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One `<option>` of a select field. `code` is the country-code attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub code: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            value: value.into(),
            code: code.map(str::to_owned),
        }
    }
}

/// Validation flag carried by every field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Validation {
    #[default]
    Unverified,
    /// Value confirmed, either locally or by a remote source.
    Valid { value: String },
    /// Value is well-formed but a remote confirmation has not arrived.
    PendingConfirmation { value: String },
}

impl Validation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    User,
    Programmatic,
}

/// Change notification emitted by [`Form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvent {
    pub field: FieldId,
    pub value: String,
    pub origin: EventOrigin,
}

/// Point-in-time view of one field, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub id: FieldId,
    pub value: String,
    pub validation: Validation,
    pub marker_shown: bool,
}

#[derive(Debug, Clone)]
enum FieldKind {
    Text,
    Select(Vec<SelectOption>),
}

#[derive(Debug, Clone)]
struct Field {
    kind: FieldKind,
    value: String,
    validation: Validation,
    marker: bool,
}

impl Field {
    fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            validation: Validation::Unverified,
            marker: false,
        }
    }
}

#[derive(Debug, Default)]
struct Fields {
    order: Vec<FieldId>,
    by_id: HashMap<FieldId, Field>,
}

#[derive(Debug, Clone)]
pub struct Form {
    fields: Arc<Mutex<Fields>>,
    events: broadcast::Sender<FieldEvent>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            fields: Arc::new(Mutex::new(Fields::default())),
            events,
        }
    }

    #[must_use]
    pub fn with_text_field(self, id: impl Into<FieldId>) -> Self {
        self.add_text_field(id);
        self
    }

    #[must_use]
    pub fn with_select(self, id: impl Into<FieldId>, options: Vec<SelectOption>) -> Self {
        self.add_select(id, options);
        self
    }

    pub fn add_text_field(&self, id: impl Into<FieldId>) {
        self.insert(id.into(), FieldKind::Text);
    }

    pub fn add_select(&self, id: impl Into<FieldId>, options: Vec<SelectOption>) {
        self.insert(id.into(), FieldKind::Select(options));
    }

    #[must_use]
    pub fn has_field(&self, id: &FieldId) -> bool {
        self.lock().by_id.contains_key(id)
    }

    #[must_use]
    pub fn value(&self, id: &FieldId) -> Option<String> {
        self.lock().by_id.get(id).map(|f| f.value.clone())
    }

    #[must_use]
    pub fn validation(&self, id: &FieldId) -> Option<Validation> {
        self.lock().by_id.get(id).map(|f| f.validation.clone())
    }

    #[must_use]
    pub fn marker_shown(&self, id: &FieldId) -> bool {
        self.lock().by_id.get(id).is_some_and(|f| f.marker)
    }

    /// Applies a user edit: stores the value, drops any validated state and
    /// notifies listeners. Returns `false` when the field does not exist.
    pub fn user_edit(&self, id: &FieldId, value: &str) -> bool {
        {
            let mut fields = self.lock();
            let Some(field) = fields.by_id.get_mut(id) else {
                return false;
            };
            field.value = value.to_owned();
            field.validation = Validation::Unverified;
            field.marker = false;
        }
        self.emit(id, value, EventOrigin::User);
        true
    }

    /// Writes a value on behalf of a widget and dispatches a synthetic change
    /// notification. The validation flag is left to the caller.
    pub fn write(&self, id: &FieldId, value: &str) -> bool {
        {
            let mut fields = self.lock();
            let Some(field) = fields.by_id.get_mut(id) else {
                return false;
            };
            field.value = value.to_owned();
        }
        self.emit(id, value, EventOrigin::Programmatic);
        true
    }

    /// Rewrites a value without notifying anybody (input sanitising).
    pub fn normalize(&self, id: &FieldId, value: &str) -> bool {
        let mut fields = self.lock();
        let Some(field) = fields.by_id.get_mut(id) else {
            return false;
        };
        field.value = value.to_owned();
        true
    }

    /// Selects the option whose country-code attribute equals `code`.
    ///
    /// Returns `false`, leaving the select untouched, when the field is not a
    /// select or no option carries that code.
    pub fn select_by_code(&self, id: &FieldId, code: &str) -> bool {
        self.select_where(id, |opt| {
            opt.code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(code))
        })
    }

    /// Selects the option whose value equals `value`.
    pub fn select_by_value(&self, id: &FieldId, value: &str) -> bool {
        self.select_where(id, |opt| opt.value == value)
    }

    pub fn set_validation(&self, id: &FieldId, validation: Validation, marker: bool) -> bool {
        let mut fields = self.lock();
        let Some(field) = fields.by_id.get_mut(id) else {
            return false;
        };
        field.validation = validation;
        field.marker = marker;
        true
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FieldEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<FieldSnapshot> {
        let fields = self.lock();
        fields
            .order
            .iter()
            .filter_map(|id| {
                fields.by_id.get(id).map(|f| FieldSnapshot {
                    id: id.clone(),
                    value: f.value.clone(),
                    validation: f.validation.clone(),
                    marker_shown: f.marker,
                })
            })
            .collect()
    }

    fn select_where<P>(&self, id: &FieldId, predicate: P) -> bool
    where
        P: Fn(&SelectOption) -> bool,
    {
        let value = {
            let mut fields = self.lock();
            let Some(field) = fields.by_id.get_mut(id) else {
                return false;
            };
            let FieldKind::Select(options) = &field.kind else {
                return false;
            };
            let Some(option) = options.iter().find(|opt| predicate(opt)) else {
                return false;
            };
            let value = option.value.clone();
            field.value.clone_from(&value);
            value
        };
        self.emit(id, &value, EventOrigin::Programmatic);
        true
    }

    fn insert(&self, id: FieldId, kind: FieldKind) {
        let mut fields = self.lock();
        if !fields.by_id.contains_key(&id) {
            fields.order.push(id.clone());
        }
        fields.by_id.insert(id, Field::new(kind));
    }

    fn emit(&self, id: &FieldId, value: &str, origin: EventOrigin) {
        // No subscribers is not an error.
        let _ = self.events.send(FieldEvent {
            field: id.clone(),
            value: value.to_owned(),
            origin,
        });
    }

    fn lock(&self) -> MutexGuard<'_, Fields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
