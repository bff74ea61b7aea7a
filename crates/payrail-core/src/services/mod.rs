//! Per-domain service callers. Each one only picks paths, builds the call
//! and names the response type; retries, fallback and decoding live below.

mod apm;
mod installments;
mod payments;
mod payouts;
mod reports;
mod subscriptions;

pub use apm::{AlternativeMethodsService, ApmPayment, CreateApmPaymentRequest, PaymentMethod};
pub use installments::{
    CreateInstallmentOrderRequest, Installment, InstallmentOrder, InstallmentsService,
};
pub use payments::{
    CreatePaymentRequest, Payment, PaymentStatus, PaymentsService, Refund, RefundRequest,
};
pub use payouts::{CreatePayoutRequest, Payout, PayoutStatus, PayoutsService};
pub use reports::{ReportsService, TransactionRecord, TransactionReport, TransactionReportQuery};
pub use subscriptions::{
    BillingInterval, CreateSubscriptionRequest, Subscription, SubscriptionStatus,
    SubscriptionsService,
};

use rust_decimal::Decimal;

use crate::error::ApiError;

/// Local checks shared by create requests; nothing is sent when they fail.
fn require_external_id(external_id: &str) -> Result<(), ApiError> {
    if external_id.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "external_id is required so retries cannot duplicate the operation".to_string(),
        ));
    }
    Ok(())
}

fn require_positive(field: &str, amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::InvalidRequest(format!(
            "{} must be positive, got {}",
            field, amount
        )));
    }
    Ok(())
}

fn require_currency(currency: &str) -> Result<(), ApiError> {
    if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ApiError::InvalidRequest(format!(
            "currency must be a 3-letter ISO code, got {:?}",
            currency
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn local_checks() {
        assert!(require_external_id("ord-1").is_ok());
        assert!(require_external_id("  ").is_err());
        assert!(require_positive("amount", dec!(0.01)).is_ok());
        assert!(require_positive("amount", dec!(0)).is_err());
        assert!(require_currency("EUR").is_ok());
        assert!(require_currency("EURO").is_err());
        assert!(require_currency("E1R").is_err());
    }
}
