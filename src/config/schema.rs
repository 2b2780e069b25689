use chrono::Duration;

/// Default retention window in days
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Default domain the keep-alive ping targets
pub const DEFAULT_PING_DOMAIN: &str = "herokuapp.com";

/// Default base URL of the remote timeline API
pub const DEFAULT_API_BASE_URL: &str = "https://api.feedsweep.dev/v1";

/// Credential material for the remote timeline API.
///
/// Assembled from the environment; the timeline client sends these as
/// request headers. Values are never logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

/// Complete daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment name; the keep-alive ping targets
    /// `https://{app_name}.{ping_domain}/`
    pub app_name: String,
    /// Listen port for the acknowledgment endpoint, supplied by the host
    pub port: u16,
    /// Remote API credentials
    pub credentials: ApiCredentials,
    /// Base URL of the remote timeline API
    pub api_base_url: String,
    /// Domain the keep-alive ping targets
    pub ping_domain: String,
    /// Retention window: items older than this are eviction-eligible
    pub max_age_days: i64,
}

impl Config {
    /// Retention window as a duration
    pub fn max_age(&self) -> Duration {
        Duration::days(self.max_age_days)
    }

    /// Full keep-alive ping URL derived from the deployment name
    pub fn ping_url(&self) -> String {
        format!("https://{}.{}/", self.app_name, self.ping_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            app_name: "sweeper".to_string(),
            port: 8080,
            credentials: ApiCredentials {
                api_key: "k".to_string(),
                api_secret: "s".to_string(),
                access_token: "t".to_string(),
                access_secret: "ts".to_string(),
            },
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ping_domain: DEFAULT_PING_DOMAIN.to_string(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }

    #[test]
    fn test_ping_url_derived_from_app_name() {
        assert_eq!(config().ping_url(), "https://sweeper.herokuapp.com/");
    }

    #[test]
    fn test_max_age_in_days() {
        assert_eq!(config().max_age(), Duration::days(7));
    }

    #[test]
    fn test_max_age_builds_the_retention_policy() {
        use crate::scheduler::RetentionPolicy;

        let config = config();
        let policy = RetentionPolicy {
            max_age: config.max_age(),
        };
        assert_eq!(policy, RetentionPolicy::days(config.max_age_days));
    }
}
