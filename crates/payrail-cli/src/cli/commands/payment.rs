//! `payrail payment get|create|refund`.

use anyhow::Result;
use payrail_core::services::{CreatePaymentRequest, RefundRequest};
use payrail_core::{ApiClient, CancellationToken};
use rust_decimal::Decimal;

use super::print_json;

pub async fn run_payment_get(client: &ApiClient, id: &str, cancel: &CancellationToken) -> Result<()> {
    let payment = client.payments().get(id, cancel).await?;
    print_json(&payment)
}

pub async fn run_payment_create(
    client: &ApiClient,
    order_id: String,
    amount: Decimal,
    currency: String,
    description: Option<String>,
    cancel: &CancellationToken,
) -> Result<()> {
    let request = CreatePaymentRequest {
        external_id: order_id,
        amount,
        currency: currency.to_ascii_uppercase(),
        description,
        ..Default::default()
    };
    let payment = client.payments().create(&request, cancel).await?;
    tracing::info!(payment_id = %payment.id, "payment created");
    print_json(&payment)
}

pub async fn run_payment_refund(
    client: &ApiClient,
    id: &str,
    amount: Decimal,
    reason: Option<String>,
    cancel: &CancellationToken,
) -> Result<()> {
    let request = RefundRequest {
        amount,
        reason,
        external_id: None,
    };
    let refund = client.payments().refund(id, &request, cancel).await?;
    print_json(&refund)
}
