// Public modules
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod observability;
pub mod pricing;
pub mod project;
pub mod providers;
pub mod render;
pub mod types;

// Re-exports
pub use client::ProviderClient;
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use pricing::{PricingEntry, PricingTable};
pub use providers::{Exchange, NO_RESPONSE, Provider, ProviderKind};
pub use types::{Role, TokenUsage, Turn};
