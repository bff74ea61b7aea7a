use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{require_currency, require_external_id, require_positive};
use crate::client::ApiClient;
use crate::codec::min_datetime;
use crate::error::ApiError;
use crate::executor::Call;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Authorized,
    Captured,
    PartiallyRefunded,
    Refunded,
    Cancelled,
    Failed,
    /// Status added upstream after this client was built.
    #[serde(other)]
    Unknown,
}

/// Card or hosted-page payment. `external_id` is the merchant's order key;
/// the API deduplicates retried creates on it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePaymentRequest {
    pub external_id: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_int32"
    )]
    pub installments: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub id: String,
    pub external_id: String,
    pub status: PaymentStatus,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_decimal"
    )]
    pub refunded_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_datetime"
    )]
    pub captured_at: Option<DateTime<Utc>>,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            id: String::new(),
            external_id: String::new(),
            status: PaymentStatus::default(),
            amount: Decimal::ZERO,
            currency: String::new(),
            refunded_amount: None,
            description: None,
            created_at: min_datetime(),
            captured_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RefundRequest {
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Refund {
    pub id: String,
    pub payment_id: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub status: String,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Default for Refund {
    fn default() -> Self {
        Self {
            id: String::new(),
            payment_id: String::new(),
            amount: Decimal::ZERO,
            status: String::new(),
            created_at: min_datetime(),
        }
    }
}

pub struct PaymentsService<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &CreatePaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<Payment, ApiError> {
        require_external_id(&request.external_id)?;
        require_positive("amount", request.amount)?;
        require_currency(&request.currency)?;
        let call = Call::post().json(request)?;
        self.client.executor().execute("payments", &call, cancel).await
    }

    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<Payment, ApiError> {
        let call = Call::get().param("id", id);
        self.client.executor().execute("payments/{id}", &call, cancel).await
    }

    pub async fn refund(
        &self,
        id: &str,
        request: &RefundRequest,
        cancel: &CancellationToken,
    ) -> Result<Refund, ApiError> {
        require_positive("refund amount", request.amount)?;
        let call = Call::post().param("id", id).json(request)?;
        self.client
            .executor()
            .execute("payments/{id}/refunds", &call, cancel)
            .await
    }

    /// Void an authorized, uncaptured payment.
    pub async fn cancel(&self, id: &str, cancel: &CancellationToken) -> Result<Payment, ApiError> {
        let call = Call::post().param("id", id);
        self.client
            .executor()
            .execute("payments/{id}/cancel", &call, cancel)
            .await
    }
}
