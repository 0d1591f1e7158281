//! Core data types shared across the client and session layers.

mod turn;
mod usage;

pub use turn::{Role, Turn};
pub use usage::TokenUsage;
