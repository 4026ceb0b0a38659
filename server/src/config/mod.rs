use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use crate::payments::config::parse_list;
use crate::payments::PaymentConfig;

pub mod cors;
pub mod security;

pub use cors::CorsSettings;
pub use security::SecurityHeadersLayer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/connectech";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local maps, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors: CorsSettings,
    /// Enables HSTS.
    pub production: bool,
    pub payment: PaymentConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut payment = PaymentConfig::default();
        if let Some(url) = lookup("PAGBANK_API_URL") {
            payment.api_url = url;
        }
        if let Some(token) = lookup("PAGBANK_TOKEN") {
            payment.token = token;
        }
        if let Some(descriptor) = lookup("PAGBANK_SOFT_DESCRIPTOR") {
            payment.soft_descriptor = descriptor;
        }
        if let Some(secs) = parsed::<u32>(&lookup, "PAGBANK_CHECKOUT_TTL_SECS")? {
            payment.checkout_ttl = Duration::seconds(i64::from(secs));
        }
        if let Some(limit) = parsed::<u8>(&lookup, "PAGBANK_INSTALLMENTS_LIMIT")? {
            payment.installments_limit = limit;
        }
        if let Some(methods) = listed(&lookup, "PAGBANK_PAYMENT_METHODS")? {
            payment.methods = methods;
        }
        if let Some(brands) = listed(&lookup, "PAGBANK_CREDIT_CARD_BRANDS")? {
            payment.credit_card_brands = brands;
        }
        if let Some(brands) = listed(&lookup, "PAGBANK_DEBIT_CARD_BRANDS")? {
            payment.debit_card_brands = brands;
        }

        Ok(Self {
            bind_addr: parsed(&lookup, "BIND_ADDR")?
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3001))),
            storage: parsed(&lookup, "STORAGE_BACKEND")?.unwrap_or(StorageBackend::Postgres),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            cors: CorsSettings::from_raw(lookup("CORS_ALLOWED_ORIGINS").as_deref()),
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            payment,
        })
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn listed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Vec<T>>, ConfigError>
where
    T: FromStr<Err = String>,
{
    lookup(key)
        .map(|raw| parse_list(&raw).map_err(|reason| ConfigError::Invalid { key, reason }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::{CardBrand, PaymentMethodType};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3001");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_max_connections, 5);
        assert!(!config.production);
        assert_eq!(config.payment.api_url, "https://sandbox.api.pagseguro.com");
        assert_eq!(config.payment.soft_descriptor, "ConnecTech");
        assert_eq!(config.payment.checkout_ttl, Duration::minutes(5));
        assert_eq!(config.payment.installments_limit, 3);
    }

    #[test]
    fn test_payment_overrides() {
        let config = config_from(&[
            ("PAGBANK_TOKEN", "tok"),
            ("PAGBANK_CHECKOUT_TTL_SECS", "600"),
            ("PAGBANK_INSTALLMENTS_LIMIT", "6"),
            ("PAGBANK_PAYMENT_METHODS", "PIX,BOLETO"),
            ("PAGBANK_CREDIT_CARD_BRANDS", "elo"),
            ("PAGBANK_DEBIT_CARD_BRANDS", "visa,hipercard"),
            ("STORAGE_BACKEND", "memory"),
            ("RUST_ENV", "Production"),
        ])
        .unwrap();

        assert_eq!(config.payment.token, "tok");
        assert_eq!(config.payment.checkout_ttl, Duration::minutes(10));
        assert_eq!(config.payment.installments_limit, 6);
        assert_eq!(
            config.payment.methods,
            vec![PaymentMethodType::Pix, PaymentMethodType::Boleto]
        );
        assert_eq!(config.payment.credit_card_brands, vec![CardBrand::Elo]);
        assert_eq!(
            config.payment.debit_card_brands,
            vec![CardBrand::Visa, CardBrand::Hipercard]
        );
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.production);
    }

    #[test]
    fn test_invalid_values_are_reported_by_key() {
        let err = config_from(&[("PAGBANK_PAYMENT_METHODS", "CASH")]).unwrap_err();
        assert!(err.to_string().contains("PAGBANK_PAYMENT_METHODS"));

        let err = config_from(&[("PAGBANK_DEBIT_CARD_BRANDS", "diners")]).unwrap_err();
        assert!(err.to_string().contains("PAGBANK_DEBIT_CARD_BRANDS"));

        let err = config_from(&[("DATABASE_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
