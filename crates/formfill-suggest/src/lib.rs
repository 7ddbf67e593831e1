//! Client for the geocoding suggest API and helpers that turn its
//! heterogeneous results into address form values.

pub mod address;
pub mod client;
pub mod error;
pub mod filter;
pub mod settings;
pub mod types;

pub use address::{format_location, parse_address, ParsedAddress};
pub use client::SuggestClient;
pub use error::SuggestError;
pub use filter::filter_by_locality;
pub use settings::{parse_locality, AddressType, SuggestSettings};
pub use types::{RegionKind, RegionalEntry, SuggestResponse, SuggestionItem};
