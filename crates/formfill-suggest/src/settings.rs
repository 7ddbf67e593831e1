/// Address categories accepted by the suggest endpoint's `type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Address,
    Street,
    Municipality,
    MunicipalityPart,
    Region,
    Country,
}

impl AddressType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::Address => "regional.address",
            AddressType::Street => "regional.street",
            AddressType::Municipality => "regional.municipality",
            AddressType::MunicipalityPart => "regional.municipality_part",
            AddressType::Region => "regional.region",
            AddressType::Country => "regional.country",
        }
    }
}

/// Request shaping for the suggest endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestSettings {
    pub lang: String,
    pub limit: u32,
    pub types: Vec<AddressType>,
    /// Lower-cased country codes; `None` means no locality restriction.
    pub locality: Option<Vec<String>>,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            lang: "cs".to_owned(),
            limit: 7,
            types: vec![
                AddressType::Address,
                AddressType::Street,
                AddressType::Municipality,
            ],
            locality: None,
        }
    }
}

impl SuggestSettings {
    /// Replaces the locality restriction from a comma-separated list;
    /// `None` or a blank list clears it.
    pub fn set_locality(&mut self, codes: Option<&str>) {
        self.locality = codes.and_then(parse_locality);
    }

    #[must_use]
    pub fn with_locality(mut self, codes: Option<&str>) -> Self {
        self.set_locality(codes);
        self
    }

    /// Query parameters in request order, without the API key.
    #[must_use]
    pub fn query_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", query.to_owned()),
            ("lang", self.lang.clone()),
            ("limit", self.limit.to_string()),
        ];
        if !self.types.is_empty() {
            let types: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
            params.push(("type", types.join(",")));
        }
        if let Some(locality) = self.locality.as_ref().filter(|l| !l.is_empty()) {
            params.push(("locality", locality.join(",")));
        }
        params
    }
}

/// Splits `"CZ, sk"` into `["cz", "sk"]`. Returns `None` when nothing remains.
#[must_use]
pub fn parse_locality(raw: &str) -> Option<Vec<String>> {
    let codes: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    (!codes.is_empty()).then_some(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_follow_request_order() {
        let params = SuggestSettings::default().query_params("Hlavní");
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["query", "lang", "limit", "type"]);
        assert_eq!(
            params[3].1,
            "regional.address,regional.street,regional.municipality"
        );
    }

    #[test]
    fn locality_is_appended_when_set() {
        let settings = SuggestSettings::default().with_locality(Some("CZ, sk"));
        let params = settings.query_params("x");
        assert_eq!(params.last().unwrap(), &("locality", "cz,sk".to_owned()));
    }

    #[test]
    fn blank_locality_clears_restriction() {
        let mut settings = SuggestSettings::default().with_locality(Some("cz"));
        settings.set_locality(Some(" , "));
        assert!(settings.locality.is_none());
        settings.set_locality(None);
        assert!(settings.locality.is_none());
    }

    #[test]
    fn empty_types_omit_filter() {
        let settings = SuggestSettings {
            types: Vec::new(),
            ..SuggestSettings::default()
        };
        assert!(settings.query_params("x").iter().all(|(k, _)| *k != "type"));
    }
}
