use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got '{other}'"),
            }),
        }
    };

    let serpapi_key = require("SERPAPI_KEY")?;
    let sheet_id = require("REVAGG_SHEET_ID")?;
    let sheets_token = require("REVAGG_SHEETS_TOKEN")?;

    let sheet_range = or_default("REVAGG_SHEET_RANGE", "AggregatedData");
    // A zero bound would stall the fan-out entirely; clamp to 1.
    let max_concurrency = parse_usize("REVAGG_MAX_CONCURRENCY", "4")?.max(1);
    let fetch_timeout_secs = parse_u64("REVAGG_FETCH_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("REVAGG_MAX_RETRIES", "2")?;
    let retry_backoff_ms = parse_u64("REVAGG_RETRY_BACKOFF_MS", "1000")?;
    let persist_sparse_records = parse_bool("REVAGG_PERSIST_SPARSE_RECORDS", "true")?;
    let log_level = or_default("REVAGG_LOG_LEVEL", "info");
    let user_agent = or_default(
        "REVAGG_USER_AGENT",
        "revagg/0.1 (hotel-review-aggregation)",
    );

    Ok(AppConfig {
        serpapi_key,
        sheet_id,
        sheets_token,
        sheet_range,
        max_concurrency,
        fetch_timeout_secs,
        max_retries,
        retry_backoff_ms,
        persist_sparse_records,
        log_level,
        user_agent,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| map.get(key).map(ToString::to_string).ok_or(VarError::NotPresent)
    }

    fn required_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SERPAPI_KEY", "test-key"),
            ("REVAGG_SHEET_ID", "sheet-123"),
            ("REVAGG_SHEETS_TOKEN", "token-abc"),
        ])
    }

    #[test]
    fn loads_with_defaults_when_only_required_vars_present() {
        let vars = required_vars();
        let config = build_config(lookup_from(&vars)).expect("config should load");

        assert_eq!(config.serpapi_key, "test-key");
        assert_eq!(config.sheet_id, "sheet-123");
        assert_eq!(config.sheet_range, "AggregatedData");
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff_ms, 1000);
        assert!(config.persist_sparse_records);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_provider_key_is_an_error_naming_the_var() {
        let mut vars = required_vars();
        vars.remove("SERPAPI_KEY");
        let err = build_config(lookup_from(&vars)).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref v) if v == "SERPAPI_KEY"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_sheet_credential_is_an_error() {
        let mut vars = required_vars();
        vars.remove("REVAGG_SHEETS_TOKEN");
        let err = build_config(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "REVAGG_SHEETS_TOKEN"));
    }

    #[test]
    fn overrides_are_applied() {
        let mut vars = required_vars();
        vars.insert("REVAGG_MAX_CONCURRENCY", "8");
        vars.insert("REVAGG_FETCH_TIMEOUT_SECS", "5");
        vars.insert("REVAGG_PERSIST_SPARSE_RECORDS", "false");
        vars.insert("REVAGG_SHEET_RANGE", "Staging");

        let config = build_config(lookup_from(&vars)).expect("config should load");
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert!(!config.persist_sparse_records);
        assert_eq!(config.sheet_range, "Staging");
    }

    #[test]
    fn zero_concurrency_is_clamped_to_one() {
        let mut vars = required_vars();
        vars.insert("REVAGG_MAX_CONCURRENCY", "0");
        let config = build_config(lookup_from(&vars)).expect("config should load");
        assert_eq!(config.max_concurrency, 1);
    }

    #[test]
    fn invalid_numeric_value_is_rejected() {
        let mut vars = required_vars();
        vars.insert("REVAGG_FETCH_TIMEOUT_SECS", "soon");
        let err = build_config(lookup_from(&vars)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "REVAGG_FETCH_TIMEOUT_SECS")
        );
    }

    #[test]
    fn invalid_bool_value_is_rejected() {
        let mut vars = required_vars();
        vars.insert("REVAGG_PERSIST_SPARSE_RECORDS", "maybe");
        let err = build_config(lookup_from(&vars)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "REVAGG_PERSIST_SPARSE_RECORDS")
        );
    }
}
