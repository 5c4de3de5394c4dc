//! Deswap - token swap client around a swap widget controller
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use domain::swap::{SwapController, SwapDeps, SwapSettings};
pub use infrastructure::MockSwapContract;
pub use shared::config::AppConfig;
