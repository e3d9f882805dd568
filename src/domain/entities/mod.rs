pub mod feedback;
pub mod subscriptions;
pub mod users;
