use std::env;

use thiserror::Error;
use tracing::debug;

use crate::config::schema::{
    ApiCredentials, Config, DEFAULT_API_BASE_URL, DEFAULT_MAX_AGE_DAYS, DEFAULT_PING_DOMAIN,
};

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
static CONFIG_TEST_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Errors produced while loading configuration from the environment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(String),

    #[error("environment variable {var} is invalid: {message}")]
    Invalid { var: String, message: String },
}

/// Loads the daemon configuration from the environment.
///
/// Required: `FEEDSWEEP_APP_NAME`, `PORT`, `FEEDSWEEP_API_KEY`,
/// `FEEDSWEEP_API_SECRET`, `FEEDSWEEP_ACCESS_TOKEN`,
/// `FEEDSWEEP_ACCESS_SECRET`. A missing required value is fatal; callers
/// exit before starting the scheduler.
///
/// Optional with defaults: `FEEDSWEEP_MAX_AGE_DAYS`,
/// `FEEDSWEEP_API_BASE_URL`, `FEEDSWEEP_PING_DOMAIN`.
pub fn load_from_env() -> Result<Config, ConfigError> {
    debug!("Loading configuration from environment");

    let app_name = required("FEEDSWEEP_APP_NAME")?;
    let port = required("PORT")?
        .parse::<u16>()
        .map_err(|e| ConfigError::Invalid {
            var: "PORT".to_string(),
            message: e.to_string(),
        })?;

    let credentials = ApiCredentials {
        api_key: required("FEEDSWEEP_API_KEY")?,
        api_secret: required("FEEDSWEEP_API_SECRET")?,
        access_token: required("FEEDSWEEP_ACCESS_TOKEN")?,
        access_secret: required("FEEDSWEEP_ACCESS_SECRET")?,
    };

    let max_age_days = match env::var("FEEDSWEEP_MAX_AGE_DAYS") {
        Ok(raw) => {
            let days = raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                var: "FEEDSWEEP_MAX_AGE_DAYS".to_string(),
                message: e.to_string(),
            })?;
            if days <= 0 {
                return Err(ConfigError::Invalid {
                    var: "FEEDSWEEP_MAX_AGE_DAYS".to_string(),
                    message: "must be a positive number of days".to_string(),
                });
            }
            days
        }
        Err(_) => DEFAULT_MAX_AGE_DAYS,
    };

    let config = Config {
        app_name,
        port,
        credentials,
        api_base_url: env::var("FEEDSWEEP_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        ping_domain: env::var("FEEDSWEEP_PING_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_PING_DOMAIN.to_string()),
        max_age_days,
    };

    debug!(
        app_name = %config.app_name,
        port = config.port,
        max_age_days = config.max_age_days,
        "Configuration loaded"
    );

    Ok(config)
}

fn required(var: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var.to_string())),
    }
}
