use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub mapy_api_key: Option<String>,
    pub suggest_base_url: String,
    pub suggest_lang: String,
    pub suggest_limit: u32,
    /// Raw comma-separated country codes; `None` disables the locality filter.
    pub suggest_locality: Option<String>,
    pub registry_base_url: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub home_country: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_usage_per_session: u64,
    pub checkout_route: String,
    pub session_path: PathBuf,
    pub form_profile_path: Option<PathBuf>,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "mapy_api_key",
                &self.mapy_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("suggest_base_url", &self.suggest_base_url)
            .field("suggest_lang", &self.suggest_lang)
            .field("suggest_limit", &self.suggest_limit)
            .field("suggest_locality", &self.suggest_locality)
            .field("registry_base_url", &self.registry_base_url)
            .field("debounce_ms", &self.debounce_ms)
            .field("min_query_len", &self.min_query_len)
            .field("home_country", &self.home_country)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_usage_per_session", &self.max_usage_per_session)
            .field("checkout_route", &self.checkout_route)
            .field("session_path", &self.session_path)
            .field("form_profile_path", &self.form_profile_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}
