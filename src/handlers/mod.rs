pub mod quiz_handler;

pub use quiz_handler::{configure, health_check, index, receive};
