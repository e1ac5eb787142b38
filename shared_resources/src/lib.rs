pub mod call_message;
pub mod config;
pub mod direction;
pub mod floor_range;
pub mod status_message;
