//! Shared building blocks for the checkout form helpers: configuration,
//! the in-memory model of the host page's fields, field mappings, the
//! verification presenter capability and the session usage counter.

pub mod app_config;
pub mod config;
pub mod error;
pub mod form;
pub mod mapping;
pub mod page;
pub mod presenter;
pub mod usage;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, SessionError};
pub use form::{EventOrigin, FieldEvent, FieldId, FieldSnapshot, Form, SelectOption, Validation};
pub use mapping::{load_form_profile, AddressMapping, ContactFields, FormProfile, RegistryFields};
pub use page::{is_checkout_page, DEFAULT_CHECKOUT_ROUTE};
pub use presenter::{FormPresenter, VerificationPresenter};
pub use usage::{
    FileSessionStore, MemorySessionStore, SessionStore, UsageCounter, UsageSummary, USAGE_KEY,
};
