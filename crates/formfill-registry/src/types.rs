//! Registry (ARES) response types.
//!
//! Only the fields used to fill the checkout form are modelled; everything
//! else in the record is ignored.

use serde::{Deserialize, Deserializer};

/// Economic subject record returned for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryRecord {
    #[serde(default)]
    pub ico: Option<String>,
    #[serde(default, rename = "obchodniJmeno")]
    pub legal_name: Option<String>,
    /// Tax identifier (DIČ), e.g. `"CZ25596641"`.
    #[serde(default, rename = "dic")]
    pub vat_id: Option<String>,
    #[serde(default, rename = "sidlo")]
    pub seat: Option<RegisteredSeat>,
}

/// Registered office address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RegisteredSeat {
    #[serde(default, rename = "nazevUlice")]
    pub street_name: Option<String>,
    #[serde(default, rename = "cisloDomovni", deserialize_with = "string_or_number")]
    pub house_number: Option<String>,
    #[serde(default, rename = "nazevObce")]
    pub municipality: Option<String>,
    #[serde(default, rename = "nazevCastiObce")]
    pub municipality_part: Option<String>,
    #[serde(default, rename = "psc", deserialize_with = "string_or_number")]
    pub postal_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

/// The registry sends house numbers and postal codes as JSON numbers, older
/// records occasionally as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }),
    )
}
