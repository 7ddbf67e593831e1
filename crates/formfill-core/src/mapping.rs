//! Which page fields each widget works with.
//!
//! A [`FormProfile`] describes the host page contract: the address blocks
//! (billing, delivery), the company-registry fields and the contact fields.
//! The built-in default matches the storefront's checkout step; a YAML file
//! can override it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::form::{FieldId, Form};
use crate::ConfigError;

/// Logical address roles mapped to concrete field ids for one address block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMapping {
    pub street: FieldId,
    pub city: FieldId,
    pub zip: FieldId,
    #[serde(default)]
    pub country: Option<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFields {
    pub ico: FieldId,
    #[serde(default)]
    pub vat_id: Option<FieldId>,
    #[serde(default)]
    pub company: Option<FieldId>,
    #[serde(default)]
    pub street: Option<FieldId>,
    #[serde(default)]
    pub city: Option<FieldId>,
    #[serde(default)]
    pub zip: Option<FieldId>,
    #[serde(default)]
    pub country: Option<FieldId>,
}

impl Default for RegistryFields {
    fn default() -> Self {
        Self {
            ico: FieldId::from("companyId"),
            vat_id: Some(FieldId::from("vatId")),
            company: Some(FieldId::from("billCompany")),
            street: Some(FieldId::from("billStreet")),
            city: Some(FieldId::from("billCity")),
            zip: Some(FieldId::from("billZip")),
            country: Some(FieldId::from("billCountryId")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub email: Option<FieldId>,
    #[serde(default)]
    pub phone: Option<FieldId>,
}

impl Default for ContactFields {
    fn default() -> Self {
        Self {
            email: Some(FieldId::from("email")),
            phone: Some(FieldId::from("phone")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProfile {
    #[serde(default)]
    pub address_blocks: Vec<AddressMapping>,
    #[serde(default)]
    pub registry: Option<RegistryFields>,
    #[serde(default)]
    pub contact: ContactFields,
}

impl Default for FormProfile {
    fn default() -> Self {
        Self {
            address_blocks: vec![
                AddressMapping {
                    street: FieldId::from("billStreet"),
                    city: FieldId::from("billCity"),
                    zip: FieldId::from("billZip"),
                    country: Some(FieldId::from("billCountryId")),
                },
                AddressMapping {
                    street: FieldId::from("deliveryStreet"),
                    city: FieldId::from("deliveryCity"),
                    zip: FieldId::from("deliveryZip"),
                    country: None,
                },
            ],
            registry: Some(RegistryFields::default()),
            contact: ContactFields::default(),
        }
    }
}

impl FormProfile {
    /// Address blocks whose street field exists on the page. Blocks with a
    /// missing street field are skipped silently.
    #[must_use]
    pub fn present_address_blocks(&self, form: &Form) -> Vec<AddressMapping> {
        self.address_blocks
            .iter()
            .filter(|block| form.has_field(&block.street))
            .cloned()
            .collect()
    }

    /// Country selects never show the verified marker.
    #[must_use]
    pub fn marker_skip_list(&self) -> Vec<FieldId> {
        let mut seen = HashSet::new();
        self.address_blocks
            .iter()
            .filter_map(|b| b.country.clone())
            .chain(self.registry.iter().filter_map(|r| r.country.clone()))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut streets = HashSet::new();
        for block in &self.address_blocks {
            for id in [&block.street, &block.city, &block.zip]
                .into_iter()
                .chain(block.country.as_ref())
            {
                if id.as_str().trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "address block field ids must be non-empty".to_string(),
                    ));
                }
            }
            if !streets.insert(block.street.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate address block street field: '{}'",
                    block.street
                )));
            }
        }

        if let Some(registry) = &self.registry {
            if registry.ico.as_str().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "registry ico field id must be non-empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Load and validate a form profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_form_profile(path: &Path) -> Result<FormProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FormProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_form_profile(&content)
}

fn parse_form_profile(content: &str) -> Result<FormProfile, ConfigError> {
    let profile: FormProfile = serde_yaml::from_str(content)?;
    profile.validate()?;
    Ok(profile)
}
