use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use uuid::Uuid;

use crate::domain::model::{BookingSubmission, SubmissionReceipt};
use crate::domain::ports::CheckoutGateway;
use crate::utils::error::{CheckoutError, Result};

/// Stand-in gateway: waits a fixed delay, then confirms every booking with
/// a generated receipt. The default mirrors the checkout it replaces.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedGateway {
    async fn submit(&self, submission: &BookingSubmission) -> Result<SubmissionReceipt> {
        tracing::info!(
            "📋 Simulating submission for {}",
            submission.contact.full_name
        );
        // 模擬API調用
        tokio::time::sleep(self.delay).await;

        let receipt = SubmissionReceipt {
            booking_id: Uuid::new_v4(),
            confirmed_at: Utc::now(),
        };
        tracing::info!("✅ Booking {} confirmed (simulated)", receipt.booking_id);
        Ok(receipt)
    }
}

/// Real gateway: POSTs the booking as JSON. A 2xx answer must carry a
/// receipt; anything else rejects the submission as a whole.
pub struct HttpCheckoutGateway {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl HttpCheckoutGateway {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

#[async_trait]
impl CheckoutGateway for HttpCheckoutGateway {
    async fn submit(&self, submission: &BookingSubmission) -> Result<SubmissionReceipt> {
        tracing::info!("🚀 Submitting booking to: {}", self.endpoint);

        // 構建請求，設定超時並執行
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(submission)
            .send()
            .await?;

        tracing::debug!("Submission response status: {}", response.status());

        // 處理 API 回應
        if !response.status().is_success() {
            return Err(CheckoutError::SubmissionRejected {
                status: response.status().as_u16(),
            });
        }

        let receipt: SubmissionReceipt = response.json().await?;
        tracing::info!("✅ Booking {} confirmed", receipt.booking_id);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContactInfo, PriceQuote, PriceQuoteRequest, ScheduleInfo};
    use crate::domain::money::Money;
    use httpmock::prelude::*;
    use std::collections::BTreeSet;

    fn sample_submission() -> BookingSubmission {
        BookingSubmission {
            contact: ContactInfo {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
            },
            service: PriceQuoteRequest {
                service_type: "home-regular".to_string(),
                property_size: "medium".to_string(),
                frequency: "weekly".to_string(),
                add_ons: BTreeSet::new(),
            },
            schedule: ScheduleInfo {
                preferred_date: "2025-11-03".to_string(),
                preferred_time: String::new(),
                notes: String::new(),
            },
            payment_method: "card".to_string(),
            quote: PriceQuote {
                base_price: Money::new(15_000),
                size_adjusted_price: Money::new(22_500),
                add_on_total: Money::ZERO,
                frequency_discount_amount: Money::new(3_375),
                total: Money::new(19_125),
                warnings: Vec::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_simulated_gateway_always_confirms() {
        let gateway = SimulatedGateway::new(Duration::from_millis(1));
        let first = gateway.submit(&sample_submission()).await.unwrap();
        let second = gateway.submit(&sample_submission()).await.unwrap();

        // every confirmation gets its own booking id
        assert_ne!(first.booking_id, second.booking_id);
    }

    #[tokio::test]
    async fn test_http_gateway_parses_receipt_on_success() {
        let server = MockServer::start();
        let receipt = SubmissionReceipt {
            booking_id: Uuid::new_v4(),
            confirmed_at: Utc::now(),
        };

        let submit_mock = server.mock(|when, then| {
            when.method(POST).path("/bookings");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::to_value(&receipt).unwrap());
        });

        let gateway = HttpCheckoutGateway::new(format!("{}/bookings", server.base_url()), 5);
        let confirmed = gateway.submit(&sample_submission()).await.unwrap();

        submit_mock.assert();
        assert_eq!(confirmed.booking_id, receipt.booking_id);
    }

    #[tokio::test]
    async fn test_http_gateway_rejects_on_non_success_status() {
        let server = MockServer::start();
        let submit_mock = server.mock(|when, then| {
            when.method(POST).path("/bookings");
            then.status(422);
        });

        let gateway = HttpCheckoutGateway::new(format!("{}/bookings", server.base_url()), 5);
        let err = gateway.submit(&sample_submission()).await.unwrap_err();

        submit_mock.assert();
        assert!(matches!(
            err,
            CheckoutError::SubmissionRejected { status: 422 }
        ));
    }
}
