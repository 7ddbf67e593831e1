//! Wires the three controllers onto a page.

use std::sync::Arc;
use std::time::Duration;

use formfill_contact::DialCodeSource;
use formfill_core::{
    is_checkout_page, AppConfig, FieldId, Form, FormPresenter, FormProfile, UsageCounter,
};
use tokio::task::JoinHandle;

use crate::autocomplete::{AddressAutocomplete, AutocompleteOptions};
use crate::contact::ContactValidator;
use crate::context::WidgetContext;
use crate::error::MountError;
use crate::registry::RegistryLookup;
use crate::source::{RegistrySource, SuggestSource};
use crate::view::{SuggestionPanel, SuggestionView};

/// Everything a page offers to the controllers.
pub struct Page<S, R> {
    pub path: String,
    pub form: Form,
    pub profile: FormProfile,
    pub suggest: S,
    pub registry: R,
    pub usage: Arc<UsageCounter>,
    pub dial: Option<Arc<dyn DialCodeSource>>,
}

/// Controllers mounted on a page. Dropping it stops their listeners.
pub struct Mounted<S, R> {
    pub autocomplete: Option<AddressAutocomplete<S>>,
    pub registry: Option<RegistryLookup<R>>,
    pub contact: ContactValidator,
    pub presenter: Arc<FormPresenter>,
    panels: Vec<(FieldId, Arc<SuggestionPanel>)>,
    tasks: Vec<JoinHandle<()>>,
}

impl<S, R> Mounted<S, R> {
    /// Suggestion panel under the given street field.
    #[must_use]
    pub fn panel(&self, street: &FieldId) -> Option<&Arc<SuggestionPanel>> {
        self.panels
            .iter()
            .find(|(id, _)| id == street)
            .map(|(_, panel)| panel)
    }
}

impl<S, R> Drop for Mounted<S, R> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Mounts every controller the page supports and starts their listeners.
///
/// All controllers share one [`FormPresenter`] whose skip-list holds the
/// configured country selects. Must be called inside a Tokio runtime.
///
/// # Errors
///
/// Returns [`MountError::NotCheckoutPage`] when `page.path` is not the
/// configured checkout step; nothing is mounted in that case.
pub fn mount<S, R>(page: Page<S, R>, config: &AppConfig) -> Result<Mounted<S, R>, MountError>
where
    S: SuggestSource,
    R: RegistrySource,
{
    if !is_checkout_page(&page.path, &config.checkout_route) {
        return Err(MountError::NotCheckoutPage {
            path: page.path,
            route: config.checkout_route.clone(),
        });
    }

    let presenter = Arc::new(
        FormPresenter::new(page.form.clone()).with_suppressed(page.profile.marker_skip_list()),
    );
    let ctx = WidgetContext::new(page.form.clone(), Arc::clone(&presenter) as _);
    let mut tasks = Vec::new();

    let blocks = page.profile.present_address_blocks(&page.form);
    let panels: Vec<(FieldId, Arc<SuggestionPanel>)> = blocks
        .iter()
        .map(|b| (b.street.clone(), Arc::new(SuggestionPanel::new())))
        .collect();
    let autocomplete = if blocks.is_empty() {
        tracing::debug!("no address block on page, autocomplete not mounted");
        None
    } else {
        let views = blocks
            .into_iter()
            .zip(&panels)
            .map(|(block, (_, panel))| (block, Arc::clone(panel) as Arc<dyn SuggestionView>))
            .collect();
        let autocomplete = AddressAutocomplete::new(
            page.suggest,
            ctx.clone(),
            page.usage,
            AutocompleteOptions::from_config(config),
            views,
        );
        tasks.push(autocomplete.listen());
        Some(autocomplete)
    };

    let registry = page.profile.registry.clone().and_then(|fields| {
        RegistryLookup::new(
            page.registry,
            ctx.clone(),
            fields,
            Duration::from_millis(config.debounce_ms),
        )
    });
    if let Some(registry) = &registry {
        tasks.push(registry.listen());
    }

    let contact = ContactValidator::new(ctx, page.profile.contact.clone(), page.dial);
    tasks.push(contact.watch());

    tracing::info!(
        path = %page.path,
        address_blocks = panels.len(),
        registry = registry.is_some(),
        "checkout helpers mounted"
    );

    Ok(Mounted {
        autocomplete,
        registry,
        contact,
        presenter,
        panels,
        tasks,
    })
}
