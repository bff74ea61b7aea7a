//! CLI command handlers, one file per API area.

mod apm;
mod config;
mod lookup;
mod payment;
mod report;

pub use apm::run_apm_methods;
pub use config::run_config;
pub use lookup::{run_installment_get, run_payout_get, run_subscription_get};
pub use payment::{run_payment_create, run_payment_get, run_payment_refund};
pub use report::run_report_transactions;

use anyhow::Result;
use serde::Serialize;

/// Print a response as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
