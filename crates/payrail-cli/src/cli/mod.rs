//! CLI for the payrail payment API client.

mod commands;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use payrail_core::{config, ApiClient, CancellationToken};
use rust_decimal::Decimal;
use std::path::PathBuf;

use commands::{
    run_apm_methods, run_config, run_installment_get, run_payment_create, run_payment_get,
    run_payment_refund, run_payout_get, run_report_transactions, run_subscription_get,
};

/// Top-level CLI for the payrail client.
#[derive(Debug, Parser)]
#[command(name = "payrail")]
#[command(about = "payrail: resilient command-line client for the payment API", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/payrail/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the config file path and effective settings (secrets redacted).
    Config,

    /// Card payments.
    Payment {
        #[command(subcommand)]
        action: PaymentCommand,
    },

    /// Payouts to bank accounts.
    Payout {
        #[command(subcommand)]
        action: GetCommand,
    },

    /// Recurring subscriptions.
    Subscription {
        #[command(subcommand)]
        action: GetCommand,
    },

    /// Installment orders.
    Installment {
        #[command(subcommand)]
        action: GetCommand,
    },

    /// Alternative payment methods.
    Apm {
        #[command(subcommand)]
        action: ApmCommand,
    },

    /// Reports.
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Fetch a payment by ID.
    Get { id: String },

    /// Create a payment.
    Create {
        /// Merchant order ID; retried creates are deduplicated on it.
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        amount: Decimal,
        /// ISO 4217 code, e.g. EUR.
        #[arg(long)]
        currency: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Refund part or all of a captured payment.
    Refund {
        id: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GetCommand {
    /// Fetch by ID.
    Get { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ApmCommand {
    /// List enabled methods.
    Methods {
        /// ISO 3166 alpha-2 country filter.
        #[arg(long)]
        country: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Transactions in [from, to).
    Transactions {
        /// Start, e.g. 2026-03-01 or 2026-03-01T00:00:00Z.
        #[arg(long, value_parser = parse_instant)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        to: DateTime<Utc>,
        #[arg(long)]
        page: Option<u32>,
    },
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    payrail_core::codec::parse_datetime(s).ok_or_else(|| format!("unrecognized date-time {:?}", s))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        if let CliCommand::Config = cli.command {
            return run_config(&cfg, cli.config.as_deref());
        }

        let client = ApiClient::from_config(&cfg).context("building API client")?;
        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, cancelling request");
                    cancel.cancel();
                }
            });
        }

        match cli.command {
            CliCommand::Config => {}
            CliCommand::Payment { action } => match action {
                PaymentCommand::Get { id } => run_payment_get(&client, &id, &cancel).await?,
                PaymentCommand::Create {
                    order_id,
                    amount,
                    currency,
                    description,
                } => {
                    run_payment_create(&client, order_id, amount, currency, description, &cancel)
                        .await?
                }
                PaymentCommand::Refund { id, amount, reason } => {
                    run_payment_refund(&client, &id, amount, reason, &cancel).await?
                }
            },
            CliCommand::Payout {
                action: GetCommand::Get { id },
            } => run_payout_get(&client, &id, &cancel).await?,
            CliCommand::Subscription {
                action: GetCommand::Get { id },
            } => run_subscription_get(&client, &id, &cancel).await?,
            CliCommand::Installment {
                action: GetCommand::Get { id },
            } => run_installment_get(&client, &id, &cancel).await?,
            CliCommand::Apm {
                action: ApmCommand::Methods { country },
            } => run_apm_methods(&client, country.as_deref(), &cancel).await?,
            CliCommand::Report {
                action: ReportCommand::Transactions { from, to, page },
            } => run_report_transactions(&client, from, to, page, &cancel).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
