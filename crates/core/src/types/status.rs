//! Status enums for orders, payments and contact messages.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment collection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    /// Cash on delivery.
    Cod,
}

/// Where a contact message is in the support workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

/// Triage priority of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).ok().as_deref(),
            Some("\"bank_transfer\"")
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::default()).ok().as_deref(),
            Some("\"pending\"")
        );
        let cod: Result<PaymentMethod, _> = serde_json::from_str("\"cod\"");
        assert_eq!(cod.ok(), Some(PaymentMethod::Cod));
        assert_eq!(
            serde_json::to_string(&ContactStatus::InProgress).ok().as_deref(),
            Some("\"in-progress\"")
        );
        assert_eq!(ContactPriority::default(), ContactPriority::Medium);
    }
}
