use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::codec::min_datetime;
use crate::codec::encode_datetime;
use crate::error::ApiError;
use crate::executor::Call;
use crate::fallback::EndpointPair;

const TRANSACTIONS: EndpointPair =
    EndpointPair::new("reports/transactions", "report/transactions");

/// Filter for the transaction report. `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone)]
pub struct TransactionReportQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TransactionReportQuery {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            status: None,
            page: None,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    pub id: String,
    /// `payment`, `refund`, `payout`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
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
    pub settled_at: Option<DateTime<Utc>>,
}

impl Default for TransactionRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: String::new(),
            status: String::new(),
            amount: Decimal::ZERO,
            fee: None,
            currency: String::new(),
            created_at: min_datetime(),
            settled_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionReport {
    pub items: Vec<TransactionRecord>,
    #[serde(with = "crate::codec::fields::int64")]
    pub total_count: i64,
    #[serde(with = "crate::codec::fields::decimal")]
    pub total_amount: Decimal,
    #[serde(with = "crate::codec::fields::int32")]
    pub page: i32,
}

pub struct ReportsService<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn transactions(
        &self,
        query: &TransactionReportQuery,
        cancel: &CancellationToken,
    ) -> Result<TransactionReport, ApiError> {
        if query.to <= query.from {
            return Err(ApiError::InvalidRequest(format!(
                "report range is empty: {} .. {}",
                encode_datetime(&query.from),
                encode_datetime(&query.to)
            )));
        }
        let call = Call::get()
            .query("from", encode_datetime(&query.from))
            .query("to", encode_datetime(&query.to))
            .query_opt("status", query.status.as_deref())
            .query_opt("page", query.page)
            .query_opt("page_size", query.page_size);
        self.client.router().call(TRANSACTIONS, &call, cancel).await
    }
}
