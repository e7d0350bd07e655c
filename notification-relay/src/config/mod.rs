use crate::models::ValidationPolicy;
use crate::services::providers::pushover::PUSHOVER_API_URL;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::middleware::CorsPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_RELAY_PATH: &str = "/send-text";
const DEFAULT_CORS_ORIGIN: &str = "https://poweredbybackstage.com";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub pushover: PushoverConfig,
    pub relay: RelaySettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct PushoverConfig {
    pub api_url: String,
    /// Application token. Absence is not checked; Pushover rejects the send.
    pub token: Secret<String>,
    /// Recipient user or group key.
    pub user_key: Secret<String>,
    pub timeout: Duration,
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            api_url: PUSHOVER_API_URL.to_string(),
            token: Secret::new(String::new()),
            user_key: Secret::new(String::new()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub path: String,
    pub validation_policy: ValidationPolicy,
    /// `None` disables CORS headers and preflight handling.
    pub cors: Option<CorsPolicy>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_RELAY_PATH.to_string(),
            validation_policy: ValidationPolicy::default(),
            cors: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let path = get_env("RELAY_PATH", DEFAULT_RELAY_PATH);
        check_relay_path(&path)?;

        let cors = if parse_env::<bool>("CORS_ENABLED", "true")? {
            let origin = get_env("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ORIGIN);
            let policy = CorsPolicy::new(&origin).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "CORS_ALLOWED_ORIGIN '{}' is not a valid header value: {}",
                    origin,
                    e
                ))
            })?;
            Some(policy)
        } else {
            None
        };

        Ok(RelayConfig {
            common,
            pushover: PushoverConfig {
                api_url: get_env("PUSHOVER_API_URL", PUSHOVER_API_URL),
                token: Secret::new(get_env("PUSHOVER_TOKEN", "")),
                user_key: Secret::new(get_env("PUSHOVER_USER_KEY", "")),
                timeout: Duration::from_secs(parse_env(
                    "PUSHOVER_TIMEOUT_SECS",
                    &DEFAULT_TIMEOUT_SECS.to_string(),
                )?),
            },
            relay: RelaySettings {
                path,
                validation_policy: parse_env("VALIDATION_POLICY", "flexible")?,
                cors,
            },
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", "info"),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

fn check_relay_path(path: &str) -> Result<(), AppError> {
    if !path.starts_with('/') {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "RELAY_PATH must start with '/', got '{}'",
            path
        )));
    }
    if RESERVED_PATHS.contains(&path) {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "RELAY_PATH '{}' collides with a built-in endpoint",
            path
        )));
    }
    Ok(())
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
