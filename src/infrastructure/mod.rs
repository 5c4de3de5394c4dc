//! Infrastructure layer - concrete collaborators for the swap widget

pub mod chain;
pub mod notifications;
pub mod wallet;

pub use chain::MockSwapContract;
pub use notifications::ConsoleNotifier;
#[cfg(test)]
pub use notifications::MemoryNotifier;
pub use wallet::LocalWalletSession;
