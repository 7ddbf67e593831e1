use std::sync::Arc;

use formfill_core::{Form, FormPresenter, VerificationPresenter};

/// What every controller receives at construction: the page's fields and
/// the shared presenter that renders "verified" state.
#[derive(Clone)]
pub struct WidgetContext {
    pub form: Form,
    pub presenter: Arc<dyn VerificationPresenter>,
}

impl WidgetContext {
    pub fn new(form: Form, presenter: Arc<dyn VerificationPresenter>) -> Self {
        Self { form, presenter }
    }

    /// Context with a plain [`FormPresenter`] and no marker skip-list.
    #[must_use]
    pub fn with_form_presenter(form: Form) -> Self {
        let presenter = Arc::new(FormPresenter::new(form.clone()));
        Self { form, presenter }
    }
}

impl std::fmt::Debug for WidgetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetContext")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}
