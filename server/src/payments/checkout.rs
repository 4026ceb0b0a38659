use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::config::{CardBrand, PaymentConfig, PaymentMethodType};
use super::PaymentError;
use crate::models::Event;

const INSTALLMENTS_LIMIT_OPTION: &str = "INSTALLMENTS_LIMIT";

/// JSON body of `POST /checkouts`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub reference_id: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub expiration_date: DateTime<Utc>,
    pub customer_modifiable: bool,
    pub items: Vec<CheckoutItem>,
    pub additional_amount: i64,
    pub discount_amount: i64,
    pub payment_methods: Vec<PaymentMethod>,
    pub payment_methods_configs: Vec<PaymentMethodConfig>,
    pub soft_descriptor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutItem {
    pub reference_id: String,
    pub name: String,
    pub quantity: u32,
    /// The event's stored price. The gateway only accepts whole,
    /// non-negative amounts.
    pub unit_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<CardBrand>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodConfig {
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub config_options: Vec<ConfigOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigOption {
    pub option: String,
    pub value: String,
}

impl CheckoutRequest {
    /// Builds a single-item checkout for `event`, expiring `checkout_ttl`
    /// after `now`.
    pub fn for_event(
        event: &Event,
        config: &PaymentConfig,
        reference_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, PaymentError> {
        let unit_amount = unit_amount(event.price)?;

        let payment_methods = config
            .methods
            .iter()
            .map(|kind| PaymentMethod {
                kind: *kind,
                brands: config.brands_for(*kind).to_vec(),
            })
            .collect();

        let payment_methods_configs = if config.methods.contains(&PaymentMethodType::CreditCard) {
            vec![PaymentMethodConfig {
                kind: PaymentMethodType::CreditCard,
                config_options: vec![ConfigOption {
                    option: INSTALLMENTS_LIMIT_OPTION.to_string(),
                    value: config.installments_limit.to_string(),
                }],
            }]
        } else {
            Vec::new()
        };

        Ok(Self {
            reference_id: reference_id.to_string(),
            expiration_date: now + config.checkout_ttl,
            customer_modifiable: true,
            items: vec![CheckoutItem {
                reference_id: event.id.to_string(),
                name: event.title.clone(),
                quantity: 1,
                unit_amount,
            }],
            additional_amount: 0,
            discount_amount: 0,
            payment_methods,
            payment_methods_configs,
            soft_descriptor: config.soft_descriptor.clone(),
        })
    }
}

fn unit_amount(price: Decimal) -> Result<i64, PaymentError> {
    if price.is_sign_negative() || !price.fract().is_zero() {
        return Err(PaymentError::InvalidAmount(price));
    }
    price.to_i64().ok_or(PaymentError::InvalidAmount(price))
}

fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
