//! Installment (buy now, pay later) orders. The API moved these endpoints;
//! older deployments still only serve the legacy paths.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{require_currency, require_external_id, require_positive};
use crate::client::ApiClient;
use crate::codec::min_datetime;
use crate::error::ApiError;
use crate::executor::Call;
use crate::fallback::EndpointPair;

const ORDERS: EndpointPair = EndpointPair::new("installment-orders", "installments/orders");
const ORDER: EndpointPair = EndpointPair::new("installment-orders/{id}", "installments/orders/{id}");

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateInstallmentOrderRequest {
    pub external_id: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(with = "crate::codec::fields::int32")]
    pub installment_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Installment {
    #[serde(with = "crate::codec::fields::int32")]
    pub sequence: i32,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    #[serde(with = "crate::codec::fields::datetime")]
    pub due_date: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_datetime"
    )]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Default for Installment {
    fn default() -> Self {
        Self {
            sequence: 0,
            amount: Decimal::ZERO,
            due_date: min_datetime(),
            paid_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallmentOrder {
    pub id: String,
    pub external_id: String,
    pub status: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub total_amount: Decimal,
    pub currency: String,
    pub installments: Vec<Installment>,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Default for InstallmentOrder {
    fn default() -> Self {
        Self {
            id: String::new(),
            external_id: String::new(),
            status: String::new(),
            total_amount: Decimal::ZERO,
            currency: String::new(),
            installments: Vec::new(),
            created_at: min_datetime(),
        }
    }
}

pub struct InstallmentsService<'a> {
    client: &'a ApiClient,
}

impl<'a> InstallmentsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_order(
        &self,
        request: &CreateInstallmentOrderRequest,
        cancel: &CancellationToken,
    ) -> Result<InstallmentOrder, ApiError> {
        require_external_id(&request.external_id)?;
        require_positive("amount", request.amount)?;
        require_currency(&request.currency)?;
        if request.installment_count < 2 {
            return Err(ApiError::InvalidRequest(format!(
                "installment_count must be at least 2, got {}",
                request.installment_count
            )));
        }
        let call = Call::post().json(request)?;
        self.client.router().call(ORDERS, &call, cancel).await
    }

    pub async fn get_order(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<InstallmentOrder, ApiError> {
        let call = Call::get().param("id", id);
        self.client.router().call(ORDER, &call, cancel).await
    }
}
