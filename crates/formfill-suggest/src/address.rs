//! Mapping a suggestion onto street / city / zip / country form values.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{RegionKind, SuggestionItem};

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3}\s*\d{2})").expect("valid zip regex"));

/// Country names that resolve to a code when the API omits `isoCode`.
const COUNTRY_NAMES: [(&str, &str); 7] = [
    ("Česká republika", "CZ"),
    ("Česko", "CZ"),
    ("Czechia", "CZ"),
    ("Czech Republic", "CZ"),
    ("Slovensko", "SK"),
    ("Slovakia", "SK"),
    ("Slovenská republika", "SK"),
];

/// Form values extracted from one suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedAddress {
    /// Street name plus house number, or the raw display name.
    pub street: String,
    pub city: String,
    /// Digits only.
    pub zip: String,
    /// Country code for selecting the country option.
    pub country: String,
}

/// Parses `item` into form values. `home_country` is the code used when the
/// suggestion does not name a different country.
#[must_use]
pub fn parse_address(item: &SuggestionItem, home_country: &str) -> ParsedAddress {
    let mut parsed = ParsedAddress {
        country: home_country.to_uppercase(),
        ..ParsedAddress::default()
    };

    if item.regional_structure.is_some() {
        let street = [
            item.region_name(RegionKind::Street),
            item.region_name(RegionKind::Address),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        let street = street.trim();
        parsed.street = if street.is_empty() {
            item.name.clone()
        } else {
            street.to_owned()
        };
        parsed.city = item.region_name(RegionKind::Municipality).to_owned();
        if let Some(zip) = &item.zip {
            parsed.zip = digits_only(zip);
        }
        if let Some(code) = country_code(item) {
            parsed.country = code;
        }
    } else {
        let location = item.location.as_deref().unwrap_or("");
        let mut parts = item.name.split(',').map(str::trim);
        if item.name.contains(',') {
            parsed.street = parts.next().unwrap_or("").to_owned();
            parsed.city = parts.next().unwrap_or("").to_owned();
        } else {
            parsed.street.clone_from(&item.name);
        }
        if parsed.city.is_empty() && !location.is_empty() {
            parsed.city = location.split(',').next().unwrap_or("").trim().to_owned();
        }
        let haystack = format!("{} {location}", item.name);
        if let Some(m) = ZIP_RE.captures(&haystack).and_then(|c| c.get(1)) {
            parsed.zip = digits_only(m.as_str());
        }
    }

    parsed
}

/// Secondary display line: municipality, district (when different) and
/// country, comma separated.
#[must_use]
pub fn format_location(item: &SuggestionItem) -> String {
    if item.regional_structure.is_none() {
        return String::new();
    }
    let municipality = item.region_name(RegionKind::Municipality);
    let district = item.region_name(RegionKind::District);
    let country = item.region_name(RegionKind::Country);

    let mut parts = Vec::new();
    if !municipality.is_empty() {
        parts.push(municipality);
    }
    if !district.is_empty() && district != municipality {
        parts.push(district);
    }
    if !country.is_empty() {
        parts.push(country);
    }
    parts.join(", ")
}

/// Explicit `isoCode` first, then a known localized name, then the raw name.
fn country_code(item: &SuggestionItem) -> Option<String> {
    let country = item.region(RegionKind::Country)?;
    if let Some(code) = country.iso_code.as_deref().filter(|c| !c.trim().is_empty()) {
        return Some(code.trim().to_uppercase());
    }
    if country.name.is_empty() {
        return None;
    }
    let code = COUNTRY_NAMES
        .iter()
        .find(|(name, _)| *name == country.name)
        .map_or_else(|| country.name.clone(), |(_, code)| (*code).to_owned());
    Some(code)
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionalEntry;

    fn entry(kind: RegionKind, name: &str) -> RegionalEntry {
        RegionalEntry {
            kind,
            name: name.to_owned(),
            iso_code: None,
        }
    }

    fn hlavni() -> SuggestionItem {
        SuggestionItem {
            name: "Hlavní 12".to_owned(),
            location: Some("Praha, Česko".to_owned()),
            zip: Some("110 00".to_owned()),
            regional_structure: Some(vec![
                entry(RegionKind::Address, "12"),
                entry(RegionKind::Street, "Hlavní"),
                entry(RegionKind::Municipality, "Praha"),
            ]),
        }
    }

    #[test]
    fn structured_item_fills_every_role() {
        let parsed = parse_address(&hlavni(), "CZ");
        assert_eq!(
            parsed,
            ParsedAddress {
                street: "Hlavní 12".to_owned(),
                city: "Praha".to_owned(),
                zip: "11000".to_owned(),
                country: "CZ".to_owned(),
            }
        );
    }

    #[test]
    fn structured_item_without_street_falls_back_to_name() {
        let item = SuggestionItem {
            name: "Kostelec nad Orlicí".to_owned(),
            location: None,
            zip: None,
            regional_structure: Some(vec![entry(RegionKind::Municipality, "Kostelec nad Orlicí")]),
        };
        let parsed = parse_address(&item, "CZ");
        assert_eq!(parsed.street, "Kostelec nad Orlicí");
        assert_eq!(parsed.city, "Kostelec nad Orlicí");
        assert!(parsed.zip.is_empty());
    }

    #[test]
    fn foreign_iso_code_overrides_home_country() {
        let mut item = hlavni();
        if let Some(entries) = item.regional_structure.as_mut() {
            entries.push(RegionalEntry {
                kind: RegionKind::Country,
                name: "Slovensko".to_owned(),
                iso_code: Some("sk".to_owned()),
            });
        }
        assert_eq!(parse_address(&item, "CZ").country, "SK");
    }

    #[test]
    fn known_country_name_resolves_to_code() {
        let mut item = hlavni();
        if let Some(entries) = item.regional_structure.as_mut() {
            entries.push(entry(RegionKind::Country, "Česká republika"));
        }
        assert_eq!(parse_address(&item, "CZ").country, "CZ");
    }

    #[test]
    fn unstructured_item_splits_name_and_finds_zip() {
        let item = SuggestionItem {
            name: "Masarykova 5, Brno".to_owned(),
            location: Some("602 00 Brno, Česko".to_owned()),
            zip: None,
            regional_structure: None,
        };
        let parsed = parse_address(&item, "CZ");
        assert_eq!(parsed.street, "Masarykova 5");
        assert_eq!(parsed.city, "Brno");
        assert_eq!(parsed.zip, "60200");
        assert_eq!(parsed.country, "CZ");
    }

    #[test]
    fn unstructured_item_takes_city_from_location() {
        let item = SuggestionItem {
            name: "Masarykova 5".to_owned(),
            location: Some("Brno, Česko".to_owned()),
            zip: None,
            regional_structure: None,
        };
        let parsed = parse_address(&item, "CZ");
        assert_eq!(parsed.street, "Masarykova 5");
        assert_eq!(parsed.city, "Brno");
        assert!(parsed.zip.is_empty());
    }

    #[test]
    fn format_location_skips_duplicate_district() {
        let item = SuggestionItem {
            name: "Hlavní 12".to_owned(),
            location: None,
            zip: None,
            regional_structure: Some(vec![
                entry(RegionKind::Municipality, "Praha"),
                entry(RegionKind::District, "Praha"),
                entry(RegionKind::Country, "Česko"),
            ]),
        };
        assert_eq!(format_location(&item), "Praha, Česko");
    }
}
