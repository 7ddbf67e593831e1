//! Suggest API response types.

use serde::{Deserialize, Deserializer};

/// Top-level suggest response: `{ "items": [ ... ] }`.
///
/// A missing or `null` `items` field is treated as no results.
#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    items: Option<Vec<SuggestionItem>>,
}

impl SuggestResponse {
    #[must_use]
    pub fn into_items(self) -> Vec<SuggestionItem> {
        self.items.unwrap_or_default()
    }
}

/// One ranked completion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Human readable locality line, e.g. `"Praha 1, Česko"`.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// Ordered breakdown from the most specific to the least specific level.
    #[serde(default)]
    pub regional_structure: Option<Vec<RegionalEntry>>,
}

impl SuggestionItem {
    /// First structure entry of the given kind.
    #[must_use]
    pub fn region(&self, kind: RegionKind) -> Option<&RegionalEntry> {
        self.regional_structure
            .as_deref()
            .and_then(|entries| entries.iter().find(|e| e.kind == kind))
    }

    /// Name of the first structure entry of the given kind, or `""`.
    #[must_use]
    pub fn region_name(&self, kind: RegionKind) -> &str {
        self.region(kind).map_or("", |e| e.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalEntry {
    #[serde(rename = "type")]
    pub kind: RegionKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub iso_code: Option<String>,
}

/// Vocabulary of `regionalStructure[].type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RegionKind {
    /// House number level.
    #[serde(rename = "regional.address")]
    Address,
    #[serde(rename = "regional.street")]
    Street,
    #[serde(rename = "regional.municipality_part")]
    MunicipalityPart,
    #[serde(rename = "regional.municipality")]
    Municipality,
    #[serde(rename = "regional.district")]
    District,
    #[serde(rename = "regional.region")]
    Region,
    #[serde(rename = "regional.country")]
    Country,
    #[serde(other)]
    Other,
}

/// Names arrive as `null` on some items; treat that like a missing name.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_structured_item() {
        let raw = serde_json::json!({
            "name": "Hlavní 12",
            "location": "Praha, Česko",
            "zip": "110 00",
            "regionalStructure": [
                { "type": "regional.address", "name": "12" },
                { "type": "regional.street", "name": "Hlavní" },
                { "type": "regional.municipality", "name": "Praha" },
                { "type": "regional.country", "name": "Česko", "isoCode": "CZ" }
            ]
        });
        let item: SuggestionItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.region_name(RegionKind::Street), "Hlavní");
        assert_eq!(item.region_name(RegionKind::Address), "12");
        assert_eq!(
            item.region(RegionKind::Country)
                .and_then(|c| c.iso_code.as_deref()),
            Some("CZ")
        );
    }

    #[test]
    fn unknown_region_kind_maps_to_other() {
        let raw = serde_json::json!({
            "name": "X",
            "regionalStructure": [{ "type": "regional.cadastral_area", "name": "Y" }]
        });
        let item: SuggestionItem = serde_json::from_value(raw).unwrap();
        let entries = item.regional_structure.unwrap();
        assert_eq!(entries[0].kind, RegionKind::Other);
    }

    #[test]
    fn null_items_is_empty() {
        let resp: SuggestResponse = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(resp.into_items().is_empty());
        let resp: SuggestResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_items().is_empty());
    }

    #[test]
    fn null_names_become_empty() {
        let raw = r#"{"items": [
            { "name": null, "location": "Praha",
              "regionalStructure": [{ "type": "regional.municipality", "name": null }] },
            { "location": "Brno" }
        ]}"#;
        let items = serde_json::from_str::<SuggestResponse>(raw)
            .unwrap()
            .into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "");
        assert_eq!(items[0].region_name(RegionKind::Municipality), "");
        assert_eq!(items[1].name, "");
    }
}
