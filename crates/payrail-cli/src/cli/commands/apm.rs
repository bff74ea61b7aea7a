//! `payrail apm methods` – list enabled alternative payment methods.

use anyhow::Result;
use payrail_core::{ApiClient, CancellationToken};

pub async fn run_apm_methods(
    client: &ApiClient,
    country: Option<&str>,
    cancel: &CancellationToken,
) -> Result<()> {
    let methods = client
        .alternative_methods()
        .list_methods(country, cancel)
        .await?;
    if methods.is_empty() {
        println!("No payment methods enabled.");
        return Ok(());
    }
    println!("{:<16} {:<24} {:<8} {}", "CODE", "NAME", "COUNTRY", "CURRENCIES");
    for m in methods {
        println!(
            "{:<16} {:<24} {:<8} {}",
            m.code,
            m.name,
            m.country.as_deref().unwrap_or("-"),
            m.currencies.join(",")
        );
    }
    Ok(())
}
