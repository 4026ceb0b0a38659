use std::fmt;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;

use super::checkout::CheckoutRequest;
use super::config::PaymentConfig;
use super::{CheckoutGateway, PaymentError};
use crate::models::CheckoutLink;

/// Position of the customer-facing payment URL in the `links` array of a
/// created checkout.
const PAYMENT_LINK_INDEX: usize = 1;

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    id: String,
    #[serde(default)]
    links: Vec<CheckoutResponseLink>,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponseLink {
    href: String,
}

#[derive(Clone)]
pub struct PagBankClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl PagBankClient {
    pub fn new(http: reqwest::Client, config: &PaymentConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn checkouts_url(&self) -> String {
        format!("{}/checkouts", self.api_url)
    }
}

impl fmt::Debug for PagBankClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagBankClient")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CheckoutGateway for PagBankClient {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutLink, PaymentError> {
        let response = self
            .http
            .post(self.checkouts_url())
            .header(ACCEPT, "*/*")
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::GatewayRejected {
                status: status.as_u16(),
                body,
            });
        }

        let checkout: CheckoutResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        let link = checkout
            .links
            .into_iter()
            .nth(PAYMENT_LINK_INDEX)
            .map(|link| link.href)
            .ok_or_else(|| {
                PaymentError::MalformedResponse("checkout has no payment link".to_string())
            })?;

        tracing::debug!(checkout_id = %checkout.id, "Checkout created");

        Ok(CheckoutLink {
            id: checkout.id,
            link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PagBankClient {
        let config = PaymentConfig {
            api_url: server.uri(),
            token: "test-token".to_string(),
            ..Default::default()
        };
        PagBankClient::new(reqwest::Client::new(), &config)
    }

    fn request() -> CheckoutRequest {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Rust Night".to_string(),
            description: None,
            location: "Recife".to_string(),
            date: now,
            price: Decimal::new(2500, 2),
            image_url: String::new(),
            volunteer_id: None,
            created_at: now,
            updated_at: now,
        };
        CheckoutRequest::for_event(&event, &PaymentConfig::default(), Uuid::new_v4(), now).unwrap()
    }

    #[tokio::test]
    async fn test_created_checkout_returns_second_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({ "soft_descriptor": "ConnecTech" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "abc",
                "links": [
                    { "href": "x" },
                    { "href": "https://pay.example/abc" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let checkout = client(&server).create_checkout(&request()).await.unwrap();

        assert_eq!(
            checkout,
            CheckoutLink {
                id: "abc".to_string(),
                link: "https://pay.example/abc".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_created_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkouts"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid items"))
            .mount(&server)
            .await;

        let err = client(&server).create_checkout(&request()).await.unwrap_err();

        match err {
            PaymentError::GatewayRejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid items");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ok_instead_of_created_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc",
                "links": [{ "href": "x" }, { "href": "y" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server).create_checkout(&request()).await.unwrap_err();

        assert!(matches!(err, PaymentError::GatewayRejected { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_missing_payment_link_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "abc",
                "links": [{ "href": "x" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server).create_checkout(&request()).await.unwrap_err();

        assert!(matches!(err, PaymentError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let config = PaymentConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = PagBankClient::new(reqwest::Client::new(), &config);

        let err = client.create_checkout(&request()).await.unwrap_err();

        assert!(matches!(err, PaymentError::Transport(_)));
    }
}
