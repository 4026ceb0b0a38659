//! Checkout-session creation against the PagBank (PagSeguro) API.
//!
//! A checkout is a short-lived, gateway-side payment intent. Nothing about
//! it is stored locally: every call to [`CheckoutGateway::create_checkout`]
//! opens a new, independent session.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::CheckoutLink;
use crate::storage::StorageError;

pub mod checkout;
pub mod config;
pub mod pagbank;

pub use checkout::CheckoutRequest;
pub use config::{CardBrand, PaymentConfig, PaymentMethodType};
pub use pagbank::PagBankClient;

/// Why a payment initiation failed. Every variant reads as a generic
/// processing failure; the variant itself keeps the cause.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment processing failed: event '{0}' not found")]
    EventNotFound(Uuid),

    #[error("payment processing failed: gateway responded with status {status}")]
    GatewayRejected { status: u16, body: String },

    #[error("payment processing failed: gateway request failed")]
    Transport(#[from] reqwest::Error),

    #[error("payment processing failed: malformed gateway response: {0}")]
    MalformedResponse(String),

    #[error("payment processing failed: price {0} cannot be charged")]
    InvalidAmount(Decimal),

    #[error("payment processing failed: storage error")]
    Storage(#[from] StorageError),
}

#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Opens one checkout session. Succeeds only on HTTP 201.
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutLink, PaymentError>;
}
