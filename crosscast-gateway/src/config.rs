//! Gateway configuration from environment variables
//!
//! Credentials are read once at startup. Each platform's variables are
//! all-or-nothing: a platform with no variables set is simply not
//! served (its endpoint answers 500), while a partially configured one
//! fails startup with the missing variable named. Silent half-configs
//! are the failure mode this rules out.

use std::net::SocketAddr;

use libcrosscast::error::ConfigError;
use libcrosscast::platforms::{BlueskyCredentials, ThreadsCredentials, TwitterCredentials};
use libcrosscast::Platform;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// Everything the gateway needs to serve: bind address plus whichever
/// platform credentials the environment provides.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    pub twitter: Option<TwitterCredentials>,
    pub bluesky: Option<BlueskyCredentials>,
    pub threads: Option<ThreadsCredentials>,
}

impl GatewayConfig {
    /// Read the full configuration from the environment
    ///
    /// `addr` comes from `CROSSCAST_GATEWAY_ADDR` unless the caller
    /// already resolved one (the CLI flag wins).
    pub fn from_env(addr: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let addr = match addr {
            Some(addr) => addr,
            None => resolve_addr()?,
        };

        Ok(Self {
            addr,
            twitter: twitter_from_env()?,
            bluesky: bluesky_from_env()?,
            threads: threads_from_env()?,
        })
    }

    /// The platforms this configuration can actually serve
    pub fn configured_platforms(&self) -> Vec<Platform> {
        let mut platforms = Vec::new();
        if self.twitter.is_some() {
            platforms.push(Platform::Twitter);
        }
        if self.bluesky.is_some() {
            platforms.push(Platform::Bluesky);
        }
        if self.threads.is_some() {
            platforms.push(Platform::Threads);
        }
        platforms
    }
}

fn resolve_addr() -> Result<SocketAddr, ConfigError> {
    let raw = env_var("CROSSCAST_GATEWAY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
    raw.parse().map_err(|e| ConfigError::InvalidValue {
        field: "CROSSCAST_GATEWAY_ADDR".to_string(),
        message: format!("{} ({})", e, raw),
    })
}

/// A set and non-blank environment variable, None otherwise
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(value: Option<String>, name: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingField(name.to_string()))
}

fn twitter_from_env() -> Result<Option<TwitterCredentials>, ConfigError> {
    let api_key = env_var("TWITTER_API_KEY");
    let api_secret = env_var("TWITTER_API_SECRET");
    let access_token = env_var("TWITTER_ACCESS_TOKEN");
    let access_secret = env_var("TWITTER_ACCESS_SECRET");

    if api_key.is_none() && api_secret.is_none() && access_token.is_none() && access_secret.is_none()
    {
        return Ok(None);
    }

    Ok(Some(TwitterCredentials {
        api_key: require(api_key, "TWITTER_API_KEY")?,
        api_secret: require(api_secret, "TWITTER_API_SECRET")?,
        access_token: require(access_token, "TWITTER_ACCESS_TOKEN")?,
        access_secret: require(access_secret, "TWITTER_ACCESS_SECRET")?,
    }))
}

fn bluesky_from_env() -> Result<Option<BlueskyCredentials>, ConfigError> {
    let identifier = env_var("BLUESKY_USERNAME");
    let password = env_var("BLUESKY_PASSWORD");

    if identifier.is_none() && password.is_none() {
        return Ok(None);
    }

    Ok(Some(BlueskyCredentials {
        service: env_var("BLUESKY_SERVICE")
            .unwrap_or_else(|| libcrosscast::platforms::bluesky::DEFAULT_SERVICE_URL.to_string()),
        identifier: require(identifier, "BLUESKY_USERNAME")?,
        password: require(password, "BLUESKY_PASSWORD")?,
    }))
}

fn threads_from_env() -> Result<Option<ThreadsCredentials>, ConfigError> {
    let user_id = env_var("THREADS_USER_ID");
    let access_token = env_var("THREADS_ACCESS_TOKEN");

    if user_id.is_none() && access_token.is_none() {
        return Ok(None);
    }

    Ok(Some(ThreadsCredentials {
        user_id: require(user_id, "THREADS_USER_ID")?,
        access_token: require(access_token, "THREADS_ACCESS_TOKEN")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: &[&str] = &[
        "CROSSCAST_GATEWAY_ADDR",
        "TWITTER_API_KEY",
        "TWITTER_API_SECRET",
        "TWITTER_ACCESS_TOKEN",
        "TWITTER_ACCESS_SECRET",
        "BLUESKY_SERVICE",
        "BLUESKY_USERNAME",
        "BLUESKY_PASSWORD",
        "THREADS_USER_ID",
        "THREADS_ACCESS_TOKEN",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_empty_environment_serves_nothing() {
        clear_env();

        let config = GatewayConfig::from_env(None).unwrap();

        assert_eq!(config.addr, DEFAULT_ADDR.parse().unwrap());
        assert!(config.twitter.is_none());
        assert!(config.bluesky.is_none());
        assert!(config.threads.is_none());
        assert!(config.configured_platforms().is_empty());
    }

    #[test]
    #[serial]
    fn test_explicit_addr_wins_over_env() {
        clear_env();
        std::env::set_var("CROSSCAST_GATEWAY_ADDR", "127.0.0.1:9999");

        let addr: SocketAddr = "0.0.0.0:4000".parse().unwrap();
        let config = GatewayConfig::from_env(Some(addr)).unwrap();

        assert_eq!(config.addr, addr);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_addr_is_config_error() {
        clear_env();
        std::env::set_var("CROSSCAST_GATEWAY_ADDR", "not-an-addr");

        let result = GatewayConfig::from_env(None);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "CROSSCAST_GATEWAY_ADDR"
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_complete_twitter_group() {
        clear_env();
        std::env::set_var("TWITTER_API_KEY", "k");
        std::env::set_var("TWITTER_API_SECRET", "ks");
        std::env::set_var("TWITTER_ACCESS_TOKEN", "t");
        std::env::set_var("TWITTER_ACCESS_SECRET", "ts");

        let config = GatewayConfig::from_env(None).unwrap();

        let twitter = config.twitter.as_ref().unwrap();
        assert_eq!(twitter.api_key, "k");
        assert_eq!(twitter.access_secret, "ts");
        assert_eq!(config.configured_platforms(), vec![Platform::Twitter]);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_partial_twitter_group_fails_startup() {
        clear_env();
        std::env::set_var("TWITTER_API_KEY", "k");

        let result = GatewayConfig::from_env(None);
        assert!(matches!(
            result,
            Err(ConfigError::MissingField(ref name)) if name == "TWITTER_API_SECRET"
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bluesky_service_defaults() {
        clear_env();
        std::env::set_var("BLUESKY_USERNAME", "user.bsky.social");
        std::env::set_var("BLUESKY_PASSWORD", "app-pass");

        let config = GatewayConfig::from_env(None).unwrap();

        let bluesky = config.bluesky.unwrap();
        assert_eq!(bluesky.service, "https://bsky.social");
        assert_eq!(bluesky.identifier, "user.bsky.social");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_values_count_as_unset() {
        clear_env();
        std::env::set_var("THREADS_USER_ID", "   ");
        std::env::set_var("THREADS_ACCESS_TOKEN", "");

        let config = GatewayConfig::from_env(None).unwrap();
        assert!(config.threads.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_all_platforms_configured() {
        clear_env();
        std::env::set_var("TWITTER_API_KEY", "k");
        std::env::set_var("TWITTER_API_SECRET", "ks");
        std::env::set_var("TWITTER_ACCESS_TOKEN", "t");
        std::env::set_var("TWITTER_ACCESS_SECRET", "ts");
        std::env::set_var("BLUESKY_USERNAME", "u");
        std::env::set_var("BLUESKY_PASSWORD", "p");
        std::env::set_var("THREADS_USER_ID", "42");
        std::env::set_var("THREADS_ACCESS_TOKEN", "tok");

        let config = GatewayConfig::from_env(None).unwrap();
        assert_eq!(
            config.configured_platforms(),
            vec![Platform::Twitter, Platform::Bluesky, Platform::Threads]
        );
        clear_env();
    }
}
