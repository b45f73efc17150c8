use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::filter::FaqTable;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per question (including the first).
    pub max_attempts: u32,
    /// Delay in milliseconds before the second attempt.
    pub delay_ms: u64,
    /// Factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Optional upper bound on a single delay in milliseconds.
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    /// Same values as the AI preset.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1500,
            backoff_multiplier: 2.0,
            max_delay_ms: None,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            max_delay: self.max_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Generative model endpoint settings (`[model]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API base URL; `/models/{model}:generateContent` is appended.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key. The key itself is never stored in config.
    pub api_key_env: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            temperature: 0.2,
        }
    }
}

/// Global configuration loaded from `~/.config/intake/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Optional FAQ table (TOML); if missing, the built-in table is used.
    #[serde(default)]
    pub faq_path: Option<PathBuf>,
    /// Optional retry policy; if missing, the AI preset is used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Invalid values in an otherwise well-formed config file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("retry.backoff_multiplier must be a positive number, got {0}")]
    BadMultiplier(f64),
    #[error("retry.max_delay_ms ({max}) is below retry.delay_ms ({delay})")]
    CapBelowDelay { max: u64, delay: u64 },
    #[error("model.endpoint is not a valid URL: {0}")]
    BadEndpoint(String),
    #[error("model.temperature must be between 0 and 2, got {0}")]
    BadTemperature(f64),
}

impl IntakeConfig {
    /// Effective retry policy: `[retry]` if present, else the AI preset.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_else(RetryPolicy::ai)
    }

    /// FAQ table from `faq_path`, or the built-in table.
    pub fn faq_table(&self) -> Result<FaqTable> {
        match &self.faq_path {
            Some(path) => FaqTable::load(path),
            None => Ok(FaqTable::builtin()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(retry) = &self.retry {
            if retry.max_attempts == 0 {
                return Err(ConfigError::ZeroAttempts);
            }
            if !retry.backoff_multiplier.is_finite() || retry.backoff_multiplier <= 0.0 {
                return Err(ConfigError::BadMultiplier(retry.backoff_multiplier));
            }
            if let Some(max) = retry.max_delay_ms {
                if max < retry.delay_ms {
                    return Err(ConfigError::CapBelowDelay {
                        max,
                        delay: retry.delay_ms,
                    });
                }
            }
        }
        if url::Url::parse(&self.model.endpoint).is_err() {
            return Err(ConfigError::BadEndpoint(self.model.endpoint.clone()));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::BadTemperature(self.model.temperature));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("intake")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IntakeConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`], for an explicit path.
///
/// The file written on first run spells out the `[retry]` section with the
/// AI preset values so they can be edited in place.
pub fn load_or_init_at(path: &Path) -> Result<IntakeConfig> {
    if !path.exists() {
        let default_cfg = IntakeConfig {
            retry: Some(RetryConfig::default()),
            ..IntakeConfig::default()
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<IntakeConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: IntakeConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = IntakeConfig::default();
        assert!(cfg.retry.is_none());
        assert!(cfg.faq_path.is_none());
        assert_eq!(cfg.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.retry_policy(), RetryPolicy::ai());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn first_run_writes_retry_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake").join("config.toml");

        let created = load_or_init_at(&path).unwrap();
        assert_eq!(created.retry, Some(RetryConfig::default()));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[retry]"), "{}", written);
        assert!(written.contains("delay_ms = 1500"), "{}", written);

        let reloaded = load_or_init_at(&path).unwrap();
        assert_eq!(reloaded, created);
        assert_eq!(reloaded.retry_policy(), RetryPolicy::ai());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = IntakeConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: IntakeConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            [retry]
            max_attempts = 5
            delay_ms = 200
            backoff_multiplier = 1.5
            max_delay_ms = 1000

            [model]
            model = "gemini-1.5-pro"
        "#;
        let cfg: IntakeConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(200));
        assert_eq!(policy.backoff_multiplier, 1.5);
        assert_eq!(policy.max_delay, Some(Duration::from_millis(1000)));
        assert_eq!(cfg.model.model, "gemini-1.5-pro");
        // Unset model fields keep their defaults.
        assert_eq!(cfg.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = IntakeConfig::default();
        cfg.retry = Some(RetryConfig {
            max_attempts: 0,
            ..Default::default()
        });
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroAttempts));

        cfg.retry = Some(RetryConfig {
            backoff_multiplier: 0.0,
            ..Default::default()
        });
        assert_eq!(cfg.validate(), Err(ConfigError::BadMultiplier(0.0)));

        cfg.retry = Some(RetryConfig {
            max_delay_ms: Some(100),
            ..Default::default()
        });
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapBelowDelay {
                max: 100,
                delay: 1500
            })
        );

        cfg.retry = None;
        cfg.model.endpoint = "not a url".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::BadEndpoint(_))));
    }

    #[test]
    fn load_from_reports_invalid_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "[retry]\nmax_attempts = 0\ndelay_ms = 10\nbackoff_multiplier = 2.0\n").unwrap();
        f.flush().unwrap();
        let err = load_from(f.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("max_attempts"));
    }

    #[test]
    fn faq_table_defaults_to_builtin() {
        let cfg = IntakeConfig::default();
        assert_eq!(cfg.faq_table().unwrap(), FaqTable::builtin());
    }
}
