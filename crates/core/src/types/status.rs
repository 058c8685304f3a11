//! Status enums for various entities.
//!
//! String forms match what the point of sale stores and shows: roles are
//! lower-case (`"manager"`), order statuses and payment methods are the
//! labels a cashier sees (`"Completed"`, `"Credit Card"`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Staff role determining which permissions a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including deleting users and editing settings.
    Admin,
    /// Runs the store; manages staff but never admins.
    Manager,
    /// Rings up sales and processes returns.
    Staff,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Manager, Self::Staff];

    /// The role's stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected admin, manager or staff)")]
pub struct ParseRoleError(String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}

/// Lifecycle state of a recorded order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether an order in this status may move to `next`.
    ///
    /// Re-applying the current status is allowed. `Cancelled` is terminal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _)
                | (Self::Completed, Self::Completed | Self::Cancelled)
                | (Self::Cancelled, Self::Cancelled)
        )
    }

    /// The status label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct ParseOrderStatusError(String);

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError(s.to_owned())),
        }
    }
}

/// How the customer paid at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Mobile Payment")]
    MobilePayment,
    Other,
}

impl PaymentMethod {
    /// Every payment method offered at checkout.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::MobilePayment,
        Self::Other,
    ];

    /// The label shown on receipts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::MobilePayment => "Mobile Payment",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown payment method.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid payment method: {0}")]
pub struct ParsePaymentMethodError(String);

impl std::str::FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    /// Accepts the receipt label in any case, with spaces, dashes or
    /// underscores between words (`"credit card"`, `"mobile-payment"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "cash" => Ok(Self::Cash),
            "creditcard" | "credit" => Ok(Self::CreditCard),
            "debitcard" | "debit" => Ok(Self::DebitCard),
            "mobilepayment" | "mobile" => Ok(Self::MobilePayment),
            "other" => Ok(Self::Other),
            _ => Err(ParsePaymentMethodError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::{Cancelled, Completed, Pending};

        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Completed));

        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"Credit Card\""
        );
        assert_eq!(
            "mobile-payment".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobilePayment
        );
        assert_eq!(
            "Debit Card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::DebitCard
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
