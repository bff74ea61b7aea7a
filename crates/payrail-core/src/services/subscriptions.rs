//! Recurring billing.

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
pub enum BillingInterval {
    Day,
    Week,
    #[default]
    Month,
    Year,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Trialing,
    PastDue,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateSubscriptionRequest {
    pub external_id: String,
    pub plan_id: String,
    pub customer_email: String,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    pub interval: BillingInterval,
    /// Bill every N intervals (1 when absent).
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_int32"
    )]
    pub interval_count: Option<i32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_datetime"
    )]
    pub start_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub id: String,
    pub external_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    #[serde(with = "crate::codec::fields::decimal")]
    pub amount: Decimal,
    pub currency: String,
    pub interval: BillingInterval,
    #[serde(with = "crate::codec::fields::int32")]
    pub interval_count: i32,
    /// Cycles billed so far.
    #[serde(with = "crate::codec::fields::int32")]
    pub billing_cycles: i32,
    #[serde(with = "crate::codec::fields::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::codec::fields::option_datetime"
    )]
    pub next_billing_at: Option<DateTime<Utc>>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            id: String::new(),
            external_id: String::new(),
            plan_id: String::new(),
            status: SubscriptionStatus::default(),
            amount: Decimal::ZERO,
            currency: String::new(),
            interval: BillingInterval::default(),
            interval_count: 0,
            billing_cycles: 0,
            created_at: min_datetime(),
            next_billing_at: None,
        }
    }
}

pub struct SubscriptionsService<'a> {
    client: &'a ApiClient,
}

impl<'a> SubscriptionsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &CreateSubscriptionRequest,
        cancel: &CancellationToken,
    ) -> Result<Subscription, ApiError> {
        require_external_id(&request.external_id)?;
        require_positive("amount", request.amount)?;
        require_currency(&request.currency)?;
        if let Some(n) = request.interval_count {
            if n < 1 {
                return Err(ApiError::InvalidRequest(format!(
                    "interval_count must be at least 1, got {}",
                    n
                )));
            }
        }
        let call = Call::post().json(request)?;
        self.client
            .executor()
            .execute("subscriptions", &call, cancel)
            .await
    }

    pub async fn get(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Subscription, ApiError> {
        let call = Call::get().param("id", id);
        self.client
            .executor()
            .execute("subscriptions/{id}", &call, cancel)
            .await
    }

    pub async fn cancel(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Subscription, ApiError> {
        let call = Call::delete().param("id", id);
        self.client
            .executor()
            .execute("subscriptions/{id}", &call, cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::testing::{reply, ScriptedTransport};
    use crate::transport::Method;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use url::Url;

    fn client(t: std::sync::Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::with_transport(
            t,
            Url::parse("https://api.test/").unwrap(),
            RetryPolicy::disabled(),
        )
    }

    #[tokio::test]
    async fn create_serializes_dates_and_counts() {
        let t = ScriptedTransport::new(vec![reply(
            200,
            r#"{"id":"sub_1","interval":"week","interval_count":"2","billing_cycles":"0"}"#,
        )]);
        let request = CreateSubscriptionRequest {
            external_id: "cust-9-plan-a".to_string(),
            plan_id: "plan-a".to_string(),
            customer_email: "c@example.com".to_string(),
            amount: dec!(9.99),
            currency: "USD".to_string(),
            interval: BillingInterval::Week,
            interval_count: Some(2),
            start_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
        };
        let sub = client(t.clone())
            .subscriptions()
            .create(&request, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sub.interval, BillingInterval::Week);
        assert_eq!(sub.interval_count, 2);
        let body = String::from_utf8(t.requests()[0].body.clone().unwrap()).unwrap();
        assert!(body.contains(r#""interval":"week""#), "{}", body);
        assert!(body.contains(r#""interval_count":2"#), "{}", body);
        assert!(body.contains(r#""start_at":"2026-03-01T00:00:00.000Z""#), "{}", body);
    }

    #[tokio::test]
    async fn interval_count_must_be_positive() {
        let t = ScriptedTransport::new(vec![]);
        let request = CreateSubscriptionRequest {
            external_id: "x".to_string(),
            amount: dec!(1),
            currency: "USD".to_string(),
            interval_count: Some(0),
            ..Default::default()
        };
        let err = client(t.clone())
            .subscriptions()
            .create(&request, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(t.calls(), 0);
    }

    #[tokio::test]
    async fn cancel_sends_delete() {
        let t = ScriptedTransport::new(vec![reply(200, r#"{"id":"sub_1","status":"cancelled"}"#)]);
        let sub = client(t.clone())
            .subscriptions()
            .cancel("sub_1", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(t.requests()[0].method, Method::Delete);
        assert_eq!(t.paths(), vec!["/subscriptions/sub_1"]);
    }
}
