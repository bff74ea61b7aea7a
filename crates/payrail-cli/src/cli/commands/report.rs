//! `payrail report transactions --from --to`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use payrail_core::services::TransactionReportQuery;
use payrail_core::{ApiClient, CancellationToken};

use super::print_json;

pub async fn run_report_transactions(
    client: &ApiClient,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    page: Option<u32>,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut query = TransactionReportQuery::new(from, to);
    query.page = page;
    let report = client.reports().transactions(&query, cancel).await?;
    tracing::debug!(
        items = report.items.len(),
        total = report.total_count,
        "transaction report fetched"
    );
    print_json(&report)
}
