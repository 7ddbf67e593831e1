//! Company identifier (IČO) checks and a client for the national business
//! registry (ARES).

pub mod client;
pub mod company;
pub mod error;
pub mod ico;
pub mod types;

pub use client::RegistryClient;
pub use company::{CompanyFill, REGISTRY_COUNTRY};
pub use error::RegistryError;
pub use ico::{is_valid_ico, sanitize_ico, ICO_LEN};
pub use types::{RegisteredSeat, RegistryRecord};
