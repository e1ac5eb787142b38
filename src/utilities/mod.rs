pub mod car;
pub mod debug;
pub mod engine;
pub mod error;
pub mod request_board;
