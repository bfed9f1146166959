pub mod auth;
pub mod candidate;
pub mod election;
