//! The three checkout form controllers and the seams they are built on.
//!
//! Controllers never talk to HTTP clients or the page directly: suggestions
//! and registry records come through [`SuggestSource`] / [`RegistrySource`],
//! field state goes through [`formfill_core::Form`] and the injected
//! [`formfill_core::VerificationPresenter`], and the suggestion dropdown is a
//! [`SuggestionView`].

pub mod autocomplete;
pub mod contact;
pub mod context;
pub mod error;
mod flight;
pub mod mount;
pub mod registry;
pub mod source;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use autocomplete::{AddressAutocomplete, AutocompleteOptions, Key, QueryPhase};
pub use contact::ContactValidator;
pub use context::WidgetContext;
pub use error::MountError;
pub use mount::{mount, Mounted, Page};
pub use registry::{LookupPhase, RegistryLookup};
pub use source::{RegistrySource, SuggestSource};
pub use view::{Panel, SuggestionPanel, SuggestionRow, SuggestionView};
