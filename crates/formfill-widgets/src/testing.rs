//! Fake sources and page fixtures for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use formfill_core::{FieldId, Form, FormProfile, SelectOption};
use formfill_registry::{RegistryError, RegistryRecord};
use formfill_suggest::{RegionKind, RegionalEntry, SuggestError, SuggestionItem};

use crate::source::{RegistrySource, SuggestSource};

#[derive(Clone)]
struct Reply<T> {
    delay: Duration,
    outcome: Result<T, u16>,
}

/// Suggest source answering from a fixed table; unknown queries get an
/// empty list.
#[derive(Clone, Default)]
pub(crate) struct FakeSuggest {
    replies: HashMap<String, Reply<Vec<SuggestionItem>>>,
    locality: Option<Vec<String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSuggest {
    pub(crate) fn with(mut self, query: &str, items: Vec<SuggestionItem>) -> Self {
        self.replies.insert(
            query.to_owned(),
            Reply {
                delay: Duration::from_millis(10),
                outcome: Ok(items),
            },
        );
        self
    }

    pub(crate) fn with_delay(mut self, query: &str, delay: Duration, items: Vec<SuggestionItem>) -> Self {
        self.replies.insert(
            query.to_owned(),
            Reply {
                delay,
                outcome: Ok(items),
            },
        );
        self
    }

    pub(crate) fn with_status(mut self, query: &str, status: u16) -> Self {
        self.replies.insert(
            query.to_owned(),
            Reply {
                delay: Duration::from_millis(10),
                outcome: Err(status),
            },
        );
        self
    }

    pub(crate) fn with_locality(mut self, codes: &[&str]) -> Self {
        self.locality = Some(codes.iter().map(|c| (*c).to_owned()).collect());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SuggestSource for FakeSuggest {
    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, SuggestError> {
        self.calls.lock().unwrap().push(query.to_owned());
        let reply = self.replies.get(query).cloned().unwrap_or(Reply {
            delay: Duration::from_millis(10),
            outcome: Ok(Vec::new()),
        });
        tokio::time::sleep(reply.delay).await;
        reply
            .outcome
            .map_err(|status| SuggestError::UnexpectedStatus { status })
    }

    fn locality(&self) -> Option<&[String]> {
        self.locality.as_deref()
    }
}

/// Registry source answering from a fixed table; unknown identifiers are 404.
#[derive(Clone, Default)]
pub(crate) struct FakeRegistry {
    replies: HashMap<String, Result<RegistryRecord, u16>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRegistry {
    pub(crate) fn with(mut self, ico: &str, record: serde_json::Value) -> Self {
        let record = serde_json::from_value(record).unwrap();
        self.replies.insert(ico.to_owned(), Ok(record));
        self
    }

    pub(crate) fn with_status(mut self, ico: &str, status: u16) -> Self {
        self.replies.insert(ico.to_owned(), Err(status));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RegistrySource for FakeRegistry {
    async fn lookup(&self, ico: &str) -> Result<RegistryRecord, RegistryError> {
        self.calls.lock().unwrap().push(ico.to_owned());
        let reply = self.replies.get(ico).cloned().unwrap_or(Err(404));
        tokio::time::sleep(Duration::from_millis(10)).await;
        reply.map_err(|status| match status {
            404 => RegistryError::NotFound {
                ico: ico.to_owned(),
            },
            status => RegistryError::UnexpectedStatus {
                status,
                ico: ico.to_owned(),
            },
        })
    }
}

pub(crate) fn country_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("", None),
        SelectOption::new("1", Some("CZ")),
        SelectOption::new("2", Some("SK")),
    ]
}

/// Every field of the built-in profile, with tagged country options.
pub(crate) fn checkout_form() -> Form {
    let profile = FormProfile::default();
    let form = Form::new();
    for block in &profile.address_blocks {
        form.add_text_field(block.street.clone());
        form.add_text_field(block.city.clone());
        form.add_text_field(block.zip.clone());
        if let Some(country) = &block.country {
            form.add_select(country.clone(), country_options());
        }
    }
    for id in ["companyId", "vatId", "billCompany", "email", "phone"] {
        form.add_text_field(FieldId::from(id));
    }
    form
}

fn entry(kind: RegionKind, name: &str, iso_code: Option<&str>) -> RegionalEntry {
    RegionalEntry {
        kind,
        name: name.to_owned(),
        iso_code: iso_code.map(str::to_owned),
    }
}

/// Street "Hlavní", house number 12, Praha, 110 00.
pub(crate) fn hlavni_item() -> SuggestionItem {
    SuggestionItem {
        name: "Hlavní 12".to_owned(),
        location: Some("Praha 1, Česko".to_owned()),
        zip: Some("110 00".to_owned()),
        regional_structure: Some(vec![
            entry(RegionKind::Address, "12", None),
            entry(RegionKind::Street, "Hlavní", None),
            entry(RegionKind::Municipality, "Praha", None),
            entry(RegionKind::Country, "Česká republika", Some("CZ")),
        ]),
    }
}

pub(crate) fn plain_item(name: &str, country: Option<(&str, &str)>) -> SuggestionItem {
    SuggestionItem {
        name: name.to_owned(),
        location: None,
        zip: None,
        regional_structure: country
            .map(|(country_name, code)| vec![entry(RegionKind::Country, country_name, Some(code))]),
    }
}
