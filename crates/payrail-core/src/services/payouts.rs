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
pub enum PayoutStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePayoutRequest {
    pub external_id: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    pub recipient_name: String,
    pub recipient_iban: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Payout {
    pub id: String,
    pub external_id: String,
    pub status: PayoutStatus,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_decimal"
    )]
    pub fee: Option<Decimal>,
    pub currency: String,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_datetime"
    )]
    pub executed_at: Option<DateTime<Utc>>,
}

impl Default for Payout {
    fn default() -> Self {
        Self {
            id: String::new(),
            external_id: String::new(),
            status: PayoutStatus::default(),
            amount: Decimal::ZERO,
            fee: None,
            currency: String::new(),
            created_at: min_datetime(),
            executed_at: None,
        }
    }
}

pub struct PayoutsService<'a> {
    client: &'a ApiClient,
}

impl<'a> PayoutsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &CreatePayoutRequest,
        cancel: &CancellationToken,
    ) -> Result<Payout, ApiError> {
        require_external_id(&request.external_id)?;
        require_positive("amount", request.amount)?;
        require_currency(&request.currency)?;
        let call = Call::post().json(request)?;
        self.client.executor().execute("payouts", &call, cancel).await
    }

    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<Payout, ApiError> {
        let call = Call::get().param("id", id);
        self.client.executor().execute("payouts/{id}", &call, cancel).await
    }
}
