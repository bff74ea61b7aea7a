//! Tests for the payment subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand, PaymentCommand};
use clap::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn cli_parse_payment_get() {
    match parse(&["payrail", "payment", "get", "pay_1"]) {
        CliCommand::Payment {
            action: PaymentCommand::Get { id },
        } => assert_eq!(id, "pay_1"),
        other => panic!("expected payment get, got {:?}", other),
    }
}

#[test]
fn cli_parse_payment_create() {
    match parse(&[
        "payrail",
        "payment",
        "create",
        "--order-id",
        "ord-1",
        "--amount",
        "49.90",
        "--currency",
        "eur",
    ]) {
        CliCommand::Payment {
            action:
                PaymentCommand::Create {
                    order_id,
                    amount,
                    currency,
                    description,
                },
        } => {
            assert_eq!(order_id, "ord-1");
            assert_eq!(amount, Decimal::from_str("49.90").unwrap());
            assert_eq!(currency, "eur");
            assert!(description.is_none());
        }
        other => panic!("expected payment create, got {:?}", other),
    }
}

#[test]
fn cli_parse_payment_create_rejects_bad_amount() {
    let res = Cli::try_parse_from([
        "payrail",
        "payment",
        "create",
        "--order-id",
        "ord-1",
        "--amount",
        "ten",
        "--currency",
        "EUR",
    ]);
    assert!(res.is_err());
}

#[test]
fn cli_parse_payment_refund() {
    match parse(&[
        "payrail", "payment", "refund", "pay_1", "--amount", "5", "--reason", "damaged",
    ]) {
        CliCommand::Payment {
            action: PaymentCommand::Refund { id, amount, reason },
        } => {
            assert_eq!(id, "pay_1");
            assert_eq!(amount, Decimal::from(5));
            assert_eq!(reason.as_deref(), Some("damaged"));
        }
        other => panic!("expected payment refund, got {:?}", other),
    }
}
