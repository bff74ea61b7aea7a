//! Alternative payment methods (wallets, bank transfers, local schemes).

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

const PAYMENTS: EndpointPair = EndpointPair::new("apm/payments", "alternative-payments");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethod {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub currencies: Vec<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_decimal"
    )]
    pub min_amount: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_decimal"
    )]
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateApmPaymentRequest {
    pub external_id: String,
    /// Method `code` from `list_methods`.
    pub method: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    /// Where the payer lands after the provider's page.
    pub return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApmPayment {
    pub id: String,
    pub external_id: String,
    pub method: String,
    pub status: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Default for ApmPayment {
    fn default() -> Self {
        Self {
            id: String::new(),
            external_id: String::new(),
            method: String::new(),
            status: String::new(),
            amount: Decimal::ZERO,
            currency: String::new(),
            redirect_url: None,
            created_at: min_datetime(),
        }
    }
}

pub struct AlternativeMethodsService<'a> {
    client: &'a ApiClient,
}

impl<'a> AlternativeMethodsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Methods enabled for the merchant, optionally for one country (ISO alpha-2).
    pub async fn list_methods(
        &self,
        country: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        let call = Call::get().query_opt("country", country);
        self.client
            .executor()
            .execute("apm/methods", &call, cancel)
            .await
    }

    pub async fn create_payment(
        &self,
        request: &CreateApmPaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<ApmPayment, ApiError> {
        require_external_id(&request.external_id)?;
        require_positive("amount", request.amount)?;
        require_currency(&request.currency)?;
        if request.method.trim().is_empty() {
            return Err(ApiError::InvalidRequest("method is required".to_string()));
        }
        let call = Call::post().json(request)?;
        self.client.router().call(PAYMENTS, &call, cancel).await
    }
}
