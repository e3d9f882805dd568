use std::fmt::Display;

use serde::Serialize;

use super::subscription_statuses::SubscriptionStatus;

/// Status reported by PayHere in the `status_code` field of a payment notification.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayHereStatus {
    Success,
    Pending,
    Canceled,
    Failed,
    Chargedback,
}

impl PayHereStatus {
    /// Unknown codes are treated as pending.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => PayHereStatus::Success,
            0 => PayHereStatus::Pending,
            -1 => PayHereStatus::Canceled,
            -2 => PayHereStatus::Failed,
            -3 => PayHereStatus::Chargedback,
            _ => PayHereStatus::Pending,
        }
    }

    /// A successful payment only marks the subscription as paid; activation
    /// happens when an admin approves it.
    pub fn to_subscription_status(self) -> SubscriptionStatus {
        match self {
            PayHereStatus::Success => SubscriptionStatus::Paid,
            PayHereStatus::Pending => SubscriptionStatus::Pending,
            PayHereStatus::Canceled => SubscriptionStatus::Canceled,
            PayHereStatus::Failed => SubscriptionStatus::Failed,
            PayHereStatus::Chargedback => SubscriptionStatus::Chargedback,
        }
    }
}

impl Display for PayHereStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            PayHereStatus::Success => "success",
            PayHereStatus::Pending => "pending",
            PayHereStatus::Canceled => "canceled",
            PayHereStatus::Failed => "failed",
            PayHereStatus::Chargedback => "chargedback",
        };
        write!(f, "{}", status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_documented_codes() {
        assert_eq!(PayHereStatus::from_code(2), PayHereStatus::Success);
        assert_eq!(PayHereStatus::from_code(0), PayHereStatus::Pending);
        assert_eq!(PayHereStatus::from_code(-1), PayHereStatus::Canceled);
        assert_eq!(PayHereStatus::from_code(-2), PayHereStatus::Failed);
        assert_eq!(PayHereStatus::from_code(-3), PayHereStatus::Chargedback);
    }

    #[test]
    fn unknown_codes_default_to_pending() {
        assert_eq!(PayHereStatus::from_code(7), PayHereStatus::Pending);
        assert_eq!(PayHereStatus::from_code(-99), PayHereStatus::Pending);
    }

    #[test]
    fn success_only_marks_subscription_paid() {
        assert_eq!(
            PayHereStatus::Success.to_subscription_status(),
            SubscriptionStatus::Paid
        );
    }
}
