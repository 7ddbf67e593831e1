//! Client-side locality post-filter.
//!
//! The API's `locality` parameter biases results but does not guarantee an
//! exact match, so results are filtered again once they arrive.

use std::collections::HashSet;

use crate::types::{RegionKind, SuggestionItem};

/// Localized country names accepted regardless of the configured codes.
const COUNTRY_NAME_ALLOW_LIST: [&str; 5] = [
    "Česká republika",
    "Czechia",
    "Czech Republic",
    "Slovensko",
    "Slovakia",
];

/// Drops items whose country is outside `locality`.
///
/// Items without a structured breakdown, or whose breakdown has no country
/// entry, are kept. With no locality configured every item is kept.
#[must_use]
pub fn filter_by_locality(
    items: Vec<SuggestionItem>,
    locality: Option<&[String]>,
) -> Vec<SuggestionItem> {
    let Some(locality) = locality.filter(|l| !l.is_empty()) else {
        return items;
    };
    let allow: HashSet<String> = locality.iter().map(|c| c.to_uppercase()).collect();
    items
        .into_iter()
        .filter(|item| is_allowed(item, &allow))
        .collect()
}

fn is_allowed(item: &SuggestionItem, allow: &HashSet<String>) -> bool {
    let Some(country) = item.region(RegionKind::Country) else {
        return true;
    };
    if country
        .iso_code
        .as_deref()
        .is_some_and(|code| allow.contains(&code.to_uppercase()))
    {
        return true;
    }
    COUNTRY_NAME_ALLOW_LIST.contains(&country.name.as_str())
}
