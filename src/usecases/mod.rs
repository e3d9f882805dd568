pub mod feedback;
pub mod feedback_admin;
pub mod payments;
pub mod subscriptions;
pub mod users;
