use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;

    let env = parse_environment(&or_default("COUNTYLENS_ENV", "development"));

    let bind_addr = parse_addr("COUNTYLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("COUNTYLENS_LOG_LEVEL", "info");

    let places_request_timeout_secs = parse_u64("COUNTYLENS_REQUEST_TIMEOUT_SECS", "30")?;
    // Google requires a pause before a next_page_token becomes queryable.
    let places_page_delay_ms = parse_u64("COUNTYLENS_PAGE_DELAY_MS", "2000")?;
    let places_max_pages = parse_u32("COUNTYLENS_MAX_PAGES", "3")?;
    let default_search_radius_meters = parse_u32("COUNTYLENS_SEARCH_RADIUS_METERS", "30000")?;

    if default_search_radius_meters == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COUNTYLENS_SEARCH_RADIUS_METERS".to_string(),
            reason: "radius must be positive".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        google_maps_api_key,
        places_request_timeout_secs,
        places_page_delay_ms,
        places_max_pages,
        default_search_radius_meters,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
