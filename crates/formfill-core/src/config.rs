use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::page::DEFAULT_CHECKOUT_ROUTE;
use crate::ConfigError;

const DEFAULT_SUGGEST_BASE_URL: &str = "https://api.mapy.cz/v1/";
const DEFAULT_REGISTRY_BASE_URL: &str =
    "https://ares.gov.cz/ekonomicke-subjekty-v-be/rest/ekonomicke-subjekty";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mapy_api_key = optional("FORMFILL_MAPY_API_KEY");
    let suggest_base_url = or_default("FORMFILL_SUGGEST_BASE_URL", DEFAULT_SUGGEST_BASE_URL);
    let suggest_lang = or_default("FORMFILL_SUGGEST_LANG", "cs");
    let suggest_limit: u32 = parse_var(&or_default, "FORMFILL_SUGGEST_LIMIT", "7")?;
    let suggest_locality = optional("FORMFILL_SUGGEST_LOCALITY");
    let registry_base_url = or_default("FORMFILL_REGISTRY_BASE_URL", DEFAULT_REGISTRY_BASE_URL);

    let debounce_ms: u64 = parse_var(&or_default, "FORMFILL_DEBOUNCE_MS", "300")?;
    let min_query_len: usize = parse_var(&or_default, "FORMFILL_MIN_QUERY_LEN", "3")?;
    let home_country = or_default("FORMFILL_HOME_COUNTRY", "CZ").to_uppercase();
    if home_country.len() != 2 || !home_country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FORMFILL_HOME_COUNTRY".to_string(),
            reason: format!("expected a two-letter country code, got '{home_country}'"),
        });
    }

    let request_timeout_secs: u64 = parse_var(&or_default, "FORMFILL_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("FORMFILL_USER_AGENT", "formfill/0.1 (checkout-assist)");
    let max_usage_per_session: u64 =
        parse_var(&or_default, "FORMFILL_MAX_USAGE_PER_SESSION", "5")?;
    let checkout_route = or_default("FORMFILL_CHECKOUT_ROUTE", DEFAULT_CHECKOUT_ROUTE);
    let session_path = PathBuf::from(or_default(
        "FORMFILL_SESSION_PATH",
        ".formfill-session.json",
    ));
    let form_profile_path = optional("FORMFILL_FORM_PROFILE_PATH").map(PathBuf::from);
    let log_level = or_default("FORMFILL_LOG_LEVEL", "info");

    Ok(AppConfig {
        mapy_api_key,
        suggest_base_url,
        suggest_lang,
        suggest_limit,
        suggest_locality,
        registry_base_url,
        debounce_ms,
        min_query_len,
        home_country,
        request_timeout_secs,
        user_agent,
        max_usage_per_session,
        checkout_route,
        session_path,
        form_profile_path,
        log_level,
    })
}

fn parse_var<T, D>(or_default: &D, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: Fn(&str, &str) -> String,
{
    let raw = or_default(var, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
