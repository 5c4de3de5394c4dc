//! Application layer - CLI and services around the swap widget

pub mod commands;
pub mod services;
pub mod session;

pub use commands::{Cli, CommandExecutor, Commands};
pub use services::{SwapOutcome, SwapService, TokenListing};
pub use session::SessionCommand;
