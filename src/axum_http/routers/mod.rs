pub mod admin_feedback;
pub mod admin_subscriptions;
pub mod admin_users;
pub mod feedback;
pub mod payments;
pub mod subscriptions;
