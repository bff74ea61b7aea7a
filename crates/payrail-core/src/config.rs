use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::retry::{BackoffStrategy, RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES};

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Retries after the first attempt (0 = never retry).
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// `fixed`, `linear`, `exponential` or `exponential_jitter`.
    pub strategy: BackoffStrategy,
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            strategy: BackoffStrategy::ExponentialJitter,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            enabled: self.enabled,
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            strategy: self.strategy,
            retryable_status_codes: self.retryable_status_codes.iter().copied().collect(),
        }
    }
}

/// Client configuration loaded from `~/.config/payrail/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Sub-merchant the calls are made for (`X-ON-BEHALF-OF`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    /// Customer authorization token (`X-CUSTOMER-AUTH`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_auth: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.payrail.example/v1/".to_string(),
            username: String::new(),
            password: String::new(),
            on_behalf_of: None,
            customer_auth: None,
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            retry: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("on_behalf_of", &self.on_behalf_of)
            .field("customer_auth", &self.customer_auth.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Check the config is usable and return the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if url.cannot_be_a_base() {
            anyhow::bail!("base_url {:?} cannot be used as an API root", self.base_url);
        }
        if self.username.is_empty() {
            anyhow::bail!("username is not set");
        }
        Ok(url)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("payrail")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<ClientConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ClientConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.request_timeout_secs, 60);
        assert!(cfg.retry.is_none());
        assert_eq!(cfg.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = ClientConfig::default();
        cfg.username = "merchant".to_string();
        cfg.retry = Some(RetryConfig::default());
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ClientConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.username, "merchant");
        assert_eq!(parsed.retry, Some(RetryConfig::default()));
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            base_url = "https://sandbox.payrail.example/api/"
            username = "merchant"
            password = "secret"
            on_behalf_of = "sub-7"

            [retry]
            max_attempts = 1
            base_delay_ms = 250
            strategy = "linear"
            retryable_status_codes = [503]
        "#;
        let cfg: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.on_behalf_of.as_deref(), Some("sub-7"));
        assert_eq!(cfg.customer_auth, None);
        let policy = cfg.retry_policy();
        assert!(policy.enabled);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert_eq!(policy.strategy, BackoffStrategy::Linear);
        assert_eq!(policy.retryable_status_codes, std::collections::BTreeSet::from([503]));
    }

    #[test]
    fn unknown_strategy_is_tolerated() {
        let cfg: ClientConfig = toml::from_str("[retry]\nstrategy = \"fibonacci\"\n").unwrap();
        assert_eq!(cfg.retry_policy().strategy, BackoffStrategy::Unknown);
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut cfg = ClientConfig::default();
        cfg.password = "hunter2".to_string();
        cfg.customer_auth = Some("cust-token".to_string());
        let out = format!("{:?}", cfg);
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("cust-token"));
    }

    #[test]
    fn validate_checks_base_url_and_username() {
        let mut cfg = ClientConfig::default();
        cfg.username = "merchant".to_string();
        assert_eq!(
            cfg.validate().unwrap().as_str(),
            "https://api.payrail.example/v1/"
        );
        cfg.base_url = "not a url".to_string();
        assert!(cfg.validate().is_err());
        cfg.base_url = "mailto:ops@payrail.example".to_string();
        assert!(cfg.validate().is_err());
        let cfg = ClientConfig::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "username = \"merchant\"\nrequest_timeout_secs = 5").unwrap();
        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.username, "merchant");
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.connect_timeout_secs, 15);

        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
