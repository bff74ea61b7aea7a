//! `payrail payout|subscription|installment get <id>`.

use anyhow::Result;
use payrail_core::{ApiClient, CancellationToken};

use super::print_json;

pub async fn run_payout_get(client: &ApiClient, id: &str, cancel: &CancellationToken) -> Result<()> {
    print_json(&client.payouts().get(id, cancel).await?)
}

pub async fn run_subscription_get(
    client: &ApiClient,
    id: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    print_json(&client.subscriptions().get(id, cancel).await?)
}

pub async fn run_installment_get(
    client: &ApiClient,
    id: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    print_json(&client.installments().get_order(id, cancel).await?)
}
