use crate::types::RegistryRecord;

/// Country code of every record in the registry.
pub const REGISTRY_COUNTRY: &str = "CZ";

/// Form values derived from a registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFill {
    pub company: String,
    pub vat_id: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country: &'static str,
}

impl CompanyFill {
    /// Returns `None` for records without a legal name.
    #[must_use]
    pub fn from_record(record: &RegistryRecord) -> Option<Self> {
        let company = record
            .legal_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())?
            .to_owned();
        let seat = record.seat.clone().unwrap_or_default();

        let street_name = seat.street_name.as_deref().unwrap_or("").trim();
        let mut street_parts = Vec::new();
        if !street_name.is_empty() {
            street_parts.push(street_name);
        }
        if let Some(number) = seat.house_number.as_deref().filter(|n| !n.is_empty()) {
            street_parts.push(number);
        }
        if street_name.is_empty() {
            if let Some(part) = seat.municipality_part.as_deref().filter(|p| !p.is_empty()) {
                street_parts.push(part);
            }
        }

        Some(Self {
            company,
            vat_id: record.vat_id.clone().unwrap_or_default(),
            street: street_parts.join(" ").trim().to_owned(),
            city: seat.municipality.clone().unwrap_or_default(),
            zip: seat
                .postal_code
                .as_deref()
                .unwrap_or("")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
            country: REGISTRY_COUNTRY,
        })
    }
}
