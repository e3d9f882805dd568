pub mod enums;
pub mod feedback;
pub mod feedback_analytics;
pub mod money;
pub mod pagination;
pub mod subscriptions;
pub mod users;
