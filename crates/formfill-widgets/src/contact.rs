//! Email and phone validation for the contact fields.

use std::sync::Arc;

use formfill_contact::{check_phone, is_valid_email, DialCodeSource, PhoneCheck};
use formfill_core::{ContactFields, EventOrigin, FieldId};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::WidgetContext;

/// Validates the email and phone fields. The phone check depends on the dial
/// code chosen in the external country picker.
#[derive(Clone)]
pub struct ContactValidator {
    ctx: WidgetContext,
    fields: ContactFields,
    dial: Option<Arc<dyn DialCodeSource>>,
}

impl ContactValidator {
    /// Fields missing from the form are ignored. Both fields are validated
    /// once so a prefilled form shows its state immediately.
    pub fn new(
        ctx: WidgetContext,
        fields: ContactFields,
        dial: Option<Arc<dyn DialCodeSource>>,
    ) -> Self {
        let fields = ContactFields {
            email: fields.email.filter(|id| ctx.form.has_field(id)),
            phone: fields.phone.filter(|id| ctx.form.has_field(id)),
        };
        let validator = Self { ctx, fields, dial };
        validator.validate_email();
        validator.validate_phone();
        validator
    }

    /// `None` when the page has no email field.
    pub fn validate_email(&self) -> Option<bool> {
        let field = self.fields.email.as_ref()?;
        let value = self.ctx.form.value(field)?;
        let ok = is_valid_email(&value);
        self.publish(field, ok);
        Some(ok)
    }

    /// `None` when the page has no phone field.
    pub fn validate_phone(&self) -> Option<PhoneCheck> {
        let field = self.fields.phone.as_ref()?;
        let value = self.ctx.form.value(field)?;
        let dial = self.dial.as_ref().and_then(|d| d.current());
        let check = check_phone(&value, dial.as_deref());
        tracing::debug!(field = %field, dial = ?dial, check = ?check, "phone validated");
        self.publish(field, check.is_valid());
        Some(check)
    }

    /// Re-validates on user edits of either field and on every dial-code
    /// change. Runs until aborted.
    pub fn watch(&self) -> JoinHandle<()> {
        let mut events = self.ctx.form.subscribe();
        let mut dial_changes = self.dial.as_ref().map(|d| d.changes());
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(event) if event.origin == EventOrigin::User => this.on_edit(&event.field),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "contact validator fell behind form events");
                            this.validate_email();
                            this.validate_phone();
                        }
                        Err(RecvError::Closed) => break,
                    },
                    alive = dial_changed(&mut dial_changes) => {
                        if alive {
                            this.validate_phone();
                        } else {
                            tracing::debug!("dial code source closed");
                            dial_changes = None;
                        }
                    }
                }
            }
        })
    }

    fn on_edit(&self, field: &FieldId) {
        if self.fields.email.as_ref() == Some(field) {
            self.validate_email();
        } else if self.fields.phone.as_ref() == Some(field) {
            self.validate_phone();
        }
    }

    fn publish(&self, field: &FieldId, ok: bool) {
        if ok {
            self.ctx.presenter.mark_valid(field);
        } else {
            self.ctx.presenter.mark_invalid(field);
        }
    }
}

/// Resolves on the next dial-code change; `false` once the source is gone.
/// Never resolves without a source.
async fn dial_changed(changes: &mut Option<watch::Receiver<Option<String>>>) -> bool {
    match changes {
        Some(rx) => rx.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}
