use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::checkout::bumps::{ConditionLogic, Money, ParseConditionLogicError, ProductId};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub offers: OfferSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let offers = OfferSettings::load()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            offers,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Externally persisted order bump settings.
///
/// The logic mode is validated here, at wiring time: an unrecognized value
/// aborts startup instead of surfacing on every admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSettings {
    pub cart_total_threshold: Money,
    pub item_count_threshold: u32,
    pub condition_logic: ConditionLogic,
    pub default_product_ids: Vec<ProductId>,
}

impl OfferSettings {
    fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Ok(raw) = env::var("ORDER_BUMPS_CART_TOTAL") {
            let cents = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidCartTotalThreshold)?;
            if cents < 0 {
                return Err(ConfigError::InvalidCartTotalThreshold);
            }
            settings.cart_total_threshold = Money::from_cents(cents);
        }

        if let Ok(raw) = env::var("ORDER_BUMPS_ITEM_COUNT") {
            settings.item_count_threshold = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidItemCountThreshold)?;
        }

        if let Ok(raw) = env::var("ORDER_BUMPS_CONDITION_LOGIC") {
            settings.condition_logic = raw
                .parse::<ConditionLogic>()
                .map_err(|source| ConfigError::InvalidConditionLogic { source })?;
        }

        if let Ok(raw) = env::var("ORDER_BUMPS_PRODUCT_IDS") {
            settings.default_product_ids = parse_product_ids(&raw)?;
        }

        Ok(settings)
    }
}

impl Default for OfferSettings {
    fn default() -> Self {
        Self {
            cart_total_threshold: Money::from_major(500),
            item_count_threshold: 2,
            condition_logic: ConditionLogic::And,
            default_product_ids: vec![ProductId(187), ProductId(36)],
        }
    }
}

fn parse_product_ids(raw: &str) -> Result<Vec<ProductId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map(ProductId)
                .map_err(|_| ConfigError::InvalidProductIds {
                    value: part.to_string(),
                })
        })
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCartTotalThreshold,
    InvalidItemCountThreshold,
    InvalidConditionLogic { source: ParseConditionLogicError },
    InvalidProductIds { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCartTotalThreshold => {
                write!(
                    f,
                    "ORDER_BUMPS_CART_TOTAL must be a non-negative amount in cents"
                )
            }
            ConfigError::InvalidItemCountThreshold => {
                write!(f, "ORDER_BUMPS_ITEM_COUNT must be a valid item count")
            }
            ConfigError::InvalidConditionLogic { source } => {
                write!(f, "ORDER_BUMPS_CONDITION_LOGIC is invalid: {source}")
            }
            ConfigError::InvalidProductIds { value } => {
                write!(
                    f,
                    "ORDER_BUMPS_PRODUCT_IDS contains a non-numeric id '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidConditionLogic { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ORDER_BUMPS_CART_TOTAL");
        env::remove_var("ORDER_BUMPS_ITEM_COUNT");
        env::remove_var("ORDER_BUMPS_CONDITION_LOGIC");
        env::remove_var("ORDER_BUMPS_PRODUCT_IDS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.offers.cart_total_threshold, Money::from_major(500));
        assert_eq!(config.offers.item_count_threshold, 2);
        assert_eq!(config.offers.condition_logic, ConditionLogic::And);
        assert_eq!(
            config.offers.default_product_ids,
            vec![ProductId(187), ProductId(36)]
        );
    }

    #[test]
    fn load_reads_offer_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ORDER_BUMPS_CART_TOTAL", "25000");
        env::set_var("ORDER_BUMPS_ITEM_COUNT", "5");
        env::set_var("ORDER_BUMPS_CONDITION_LOGIC", "or");
        env::set_var("ORDER_BUMPS_PRODUCT_IDS", "12, 34,56");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.offers.cart_total_threshold,
            Money::from_cents(25_000)
        );
        assert_eq!(config.offers.item_count_threshold, 5);
        assert_eq!(config.offers.condition_logic, ConditionLogic::Or);
        assert_eq!(
            config.offers.default_product_ids,
            vec![ProductId(12), ProductId(34), ProductId(56)]
        );
        reset_env();
    }

    #[test]
    fn load_rejects_unrecognized_condition_logic() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ORDER_BUMPS_CONDITION_LOGIC", "XOR");
        match AppConfig::load() {
            Err(ConfigError::InvalidConditionLogic { source }) => {
                assert_eq!(source.0, "XOR");
            }
            other => panic!("expected invalid logic error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn load_rejects_negative_cart_total() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ORDER_BUMPS_CART_TOTAL", "-1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCartTotalThreshold)
        ));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }
}
