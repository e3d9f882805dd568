use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Internal subscription lifecycle.
///
/// `pending → paid → success`, or `pending | paid → failed | canceled | chargedback`.
/// `success`, `failed`, `canceled` and `chargedback` are terminal.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Pending,
    Paid,
    Success,
    Failed,
    Canceled,
    Chargedback,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Paid => "paid",
            SubscriptionStatus::Success => "success",
            SubscriptionStatus::Failed => "failed",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Chargedback => "chargedback",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubscriptionStatus::Pending),
            "paid" => Some(SubscriptionStatus::Paid),
            "success" => Some(SubscriptionStatus::Success),
            "failed" => Some(SubscriptionStatus::Failed),
            "canceled" => Some(SubscriptionStatus::Canceled),
            "chargedback" => Some(SubscriptionStatus::Chargedback),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Success
                | SubscriptionStatus::Failed
                | SubscriptionStatus::Canceled
                | SubscriptionStatus::Chargedback
        )
    }

    /// Statuses from which an admin may approve or reject.
    pub fn awaits_review(&self) -> bool {
        matches!(self, SubscriptionStatus::Pending | SubscriptionStatus::Paid)
    }

    /// Whether moving from `self` to `next` respects the lifecycle order.
    /// Staying on the same status is not a transition.
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        match (self, next) {
            (current, next) if *current == next => false,
            (current, _) if current.is_terminal() => false,
            (SubscriptionStatus::Paid, SubscriptionStatus::Pending) => false,
            _ => true,
        }
    }

    pub fn all() -> [SubscriptionStatus; 6] {
        [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Paid,
            SubscriptionStatus::Success,
            SubscriptionStatus::Failed,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Chargedback,
        ]
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_never_move() {
        for current in SubscriptionStatus::all().into_iter().filter(|s| s.is_terminal()) {
            for next in SubscriptionStatus::all() {
                assert!(
                    !current.can_transition_to(next),
                    "{current} must not move to {next}"
                );
            }
        }
    }

    #[test]
    fn paid_never_regresses_to_pending() {
        assert!(!SubscriptionStatus::Paid.can_transition_to(SubscriptionStatus::Pending));
        assert!(SubscriptionStatus::Paid.can_transition_to(SubscriptionStatus::Success));
        assert!(SubscriptionStatus::Paid.can_transition_to(SubscriptionStatus::Chargedback));
    }

    #[test]
    fn pending_can_move_forward() {
        assert!(SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::Paid));
        assert!(SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::Failed));
        assert!(!SubscriptionStatus::Pending.can_transition_to(SubscriptionStatus::Pending));
    }

    #[test]
    fn string_form_round_trips_for_storage() {
        for status in SubscriptionStatus::all() {
            assert_eq!(SubscriptionStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(SubscriptionStatus::from_str("active"), None);
    }
}
