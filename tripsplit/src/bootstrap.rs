use std::env;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tripsplit_application::GroupId;
use tripsplit_domain::{SplitContext, StaleReferencePolicy, services::UnsupportedScale};
use tripsplit_presentation::CurrencyDisplay;

pub const CURRENCY_SYMBOL_VAR: &str = "TRIPSPLIT_CURRENCY_SYMBOL";
pub const CURRENCY_SCALE_VAR: &str = "TRIPSPLIT_CURRENCY_SCALE";
pub const STALE_POLICY_VAR: &str = "TRIPSPLIT_STALE_POLICY";
pub const GROUP_VAR: &str = "TRIPSPLIT_GROUP";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer (got '{value}')")]
    InvalidScale { var: &'static str, value: String },
    #[error("{var}: {source}")]
    UnsupportedScale {
        var: &'static str,
        #[source]
        source: UnsupportedScale,
    },
    #[error("{var} must be 'ignore' or 'retain' (got '{value}')")]
    InvalidStalePolicy { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Application configuration, read from the environment and an optional `.env`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub currency: CurrencyDisplay,
    pub split_context: SplitContext,
    pub stale_policy: StaleReferencePolicy,
    pub group: GroupId,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyDisplay::default(),
            split_context: SplitContext::myr(),
            stale_policy: StaleReferencePolicy::default(),
            group: GroupId::from("trip"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_VAR) {
            config.currency.symbol = symbol;
        }

        if let Some(value) = lookup(CURRENCY_SCALE_VAR) {
            let scale: u32 = value.trim().parse().map_err(|_| ConfigError::InvalidScale {
                var: CURRENCY_SCALE_VAR,
                value: value.clone(),
            })?;
            config.split_context =
                SplitContext::new(scale).map_err(|source| ConfigError::UnsupportedScale {
                    var: CURRENCY_SCALE_VAR,
                    source,
                })?;
            config.currency.scale = scale;
        }

        if let Some(value) = lookup(STALE_POLICY_VAR) {
            config.stale_policy = match value.trim().to_ascii_lowercase().as_str() {
                "ignore" => StaleReferencePolicy::Ignore,
                "retain" => StaleReferencePolicy::Retain,
                _ => {
                    return Err(ConfigError::InvalidStalePolicy {
                        var: STALE_POLICY_VAR,
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup(GROUP_VAR) {
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::Empty { var: GROUP_VAR });
            }
            config.group = GroupId::from(value);
        }

        tracing::debug!(
            symbol = %config.currency.symbol,
            scale = config.currency.scale,
            stale_policy = ?config.stale_policy,
            group = %config.group,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Installs the `fmt` subscriber on stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
