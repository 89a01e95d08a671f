//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders placed by the storefront start as `Pending`; later states are set
/// by whoever fulfils the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    /// Faster Payments System transfer.
    Sbp,
    CashOnDelivery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_payment_method_serde_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).ok().as_deref(),
            Some("\"cash_on_delivery\"")
        );
        let parsed: Option<PaymentMethod> = serde_json::from_str("\"sbp\"").ok();
        assert_eq!(parsed, Some(PaymentMethod::Sbp));
    }
}
