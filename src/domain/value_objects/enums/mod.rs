pub mod feedback_tags;
pub mod payhere_statuses;
pub mod plan_types;
pub mod sentiments;
pub mod subscription_statuses;
pub mod user_roles;
