use std::collections::HashSet;

use crate::form::{FieldId, Form, Validation};

/// Capability used by widgets to publish the outcome of a check on a field.
///
/// Widgets receive an implementation at construction time; how the state is
/// rendered (checkmark, overlay icon, nothing at all) is up to the presenter.
pub trait VerificationPresenter: Send + Sync {
    fn mark_valid(&self, field: &FieldId);
    fn mark_invalid(&self, field: &FieldId);
    /// Well-formed value still waiting for remote confirmation.
    fn mark_pending_confirmation(&self, field: &FieldId);
}

/// Default presenter: records the flag on the [`Form`] itself.
///
/// Fields on the skip-list still get their validation flag, but the visual
/// marker is never shown for them.
#[derive(Debug, Clone)]
pub struct FormPresenter {
    form: Form,
    suppressed: HashSet<FieldId>,
}

impl FormPresenter {
    #[must_use]
    pub fn new(form: Form) -> Self {
        Self {
            form,
            suppressed: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_suppressed<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldId>,
    {
        self.suppressed.extend(fields);
        self
    }

    #[must_use]
    pub fn is_suppressed(&self, field: &FieldId) -> bool {
        self.suppressed.contains(field)
    }

    fn apply(&self, field: &FieldId, make: fn(String) -> Validation) {
        let Some(value) = self.form.value(field) else {
            return;
        };
        let marker = !self.is_suppressed(field);
        self.form.set_validation(field, make(value), marker);
    }
}

impl VerificationPresenter for FormPresenter {
    fn mark_valid(&self, field: &FieldId) {
        self.apply(field, |value| Validation::Valid { value });
    }

    fn mark_invalid(&self, field: &FieldId) {
        self.form
            .set_validation(field, Validation::Unverified, false);
    }

    fn mark_pending_confirmation(&self, field: &FieldId) {
        self.apply(field, |value| Validation::PendingConfirmation { value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_valid_records_current_value() {
        let form = Form::new().with_text_field("billCity");
        let id = FieldId::from("billCity");
        form.write(&id, "Praha");
        FormPresenter::new(form.clone()).mark_valid(&id);
        assert_eq!(
            form.validation(&id),
            Some(Validation::Valid {
                value: "Praha".to_owned()
            })
        );
        assert!(form.marker_shown(&id));
    }

    #[test]
    fn suppressed_field_is_flagged_without_marker() {
        let form = Form::new().with_text_field("billCountryId");
        let id = FieldId::from("billCountryId");
        let presenter = FormPresenter::new(form.clone()).with_suppressed([id.clone()]);
        presenter.mark_valid(&id);
        assert!(form.validation(&id).is_some_and(|v| v.is_valid()));
        assert!(!form.marker_shown(&id));
    }

    #[test]
    fn mark_invalid_resets_to_unverified() {
        let form = Form::new().with_text_field("companyId");
        let id = FieldId::from("companyId");
        let presenter = FormPresenter::new(form.clone());
        presenter.mark_pending_confirmation(&id);
        assert!(matches!(
            form.validation(&id),
            Some(Validation::PendingConfirmation { .. })
        ));
        presenter.mark_invalid(&id);
        assert_eq!(form.validation(&id), Some(Validation::Unverified));
        assert!(!form.marker_shown(&id));
    }
}
