pub mod api;
pub mod common;
pub mod registry;
