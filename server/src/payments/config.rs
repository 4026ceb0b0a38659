use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::Serialize;

pub const DEFAULT_API_URL: &str = "https://sandbox.api.pagseguro.com";
pub const DEFAULT_SOFT_DESCRIPTOR: &str = "ConnecTech";
pub const DEFAULT_CHECKOUT_TTL_SECS: u32 = 5 * 60;
pub const DEFAULT_INSTALLMENTS_LIMIT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl FromStr for PaymentMethodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT_CARD" => Ok(PaymentMethodType::CreditCard),
            "DEBIT_CARD" => Ok(PaymentMethodType::DebitCard),
            "PIX" => Ok(PaymentMethodType::Pix),
            "BOLETO" => Ok(PaymentMethodType::Boleto),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
    Hipercard,
}

impl FromStr for CardBrand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visa" => Ok(CardBrand::Visa),
            "mastercard" => Ok(CardBrand::Mastercard),
            "elo" => Ok(CardBrand::Elo),
            "amex" => Ok(CardBrand::Amex),
            "hipercard" => Ok(CardBrand::Hipercard),
            other => Err(format!("unknown card brand '{other}'")),
        }
    }
}

/// Everything the checkout request needs that is not taken from the event.
#[derive(Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub token: String,
    pub soft_descriptor: String,
    pub checkout_ttl: Duration,
    pub installments_limit: u8,
    pub methods: Vec<PaymentMethodType>,
    pub credit_card_brands: Vec<CardBrand>,
    pub debit_card_brands: Vec<CardBrand>,
}

impl PaymentConfig {
    /// Brands offered for `kind`; empty for non-card methods.
    pub fn brands_for(&self, kind: PaymentMethodType) -> &[CardBrand] {
        match kind {
            PaymentMethodType::CreditCard => &self.credit_card_brands,
            PaymentMethodType::DebitCard => &self.debit_card_brands,
            PaymentMethodType::Pix | PaymentMethodType::Boleto => &[],
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            soft_descriptor: DEFAULT_SOFT_DESCRIPTOR.to_string(),
            checkout_ttl: Duration::seconds(i64::from(DEFAULT_CHECKOUT_TTL_SECS)),
            installments_limit: DEFAULT_INSTALLMENTS_LIMIT,
            methods: vec![
                PaymentMethodType::CreditCard,
                PaymentMethodType::DebitCard,
                PaymentMethodType::Pix,
            ],
            credit_card_brands: vec![CardBrand::Mastercard, CardBrand::Visa],
            debit_card_brands: vec![CardBrand::Visa, CardBrand::Mastercard],
        }
    }
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("soft_descriptor", &self.soft_descriptor)
            .field("checkout_ttl", &self.checkout_ttl)
            .field("installments_limit", &self.installments_limit)
            .field("methods", &self.methods)
            .field("credit_card_brands", &self.credit_card_brands)
            .field("debit_card_brands", &self.debit_card_brands)
            .finish()
    }
}

/// Parses a comma separated option list, skipping blank entries.
pub fn parse_list<T>(raw: &str) -> Result<Vec<T>, String>
where
    T: FromStr<Err = String>,
{
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(T::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payment_methods_is_case_insensitive() {
        let methods: Vec<PaymentMethodType> = parse_list("credit_card, PIX,,Boleto").unwrap();
        assert_eq!(
            methods,
            vec![
                PaymentMethodType::CreditCard,
                PaymentMethodType::Pix,
                PaymentMethodType::Boleto
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        let err = parse_list::<CardBrand>("visa,diners").unwrap_err();
        assert!(err.contains("diners"));
    }

    #[test]
    fn test_brands_follow_method() {
        let config = PaymentConfig::default();
        assert_eq!(
            config.brands_for(PaymentMethodType::CreditCard),
            &[CardBrand::Mastercard, CardBrand::Visa]
        );
        assert_eq!(
            config.brands_for(PaymentMethodType::DebitCard),
            &[CardBrand::Visa, CardBrand::Mastercard]
        );
        assert!(config.brands_for(PaymentMethodType::Pix).is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = PaymentConfig {
            token: "secret-token".to_string(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
