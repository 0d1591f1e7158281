//! Chat application module for interactive conversations.
//!
//! This module provides the REPL layer on top of the client library:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: session state, dispatch, and cost accounting
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, SessionStats, SessionTotals, TurnReport};
