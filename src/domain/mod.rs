//! Domain layer - the swap widget and the collaborators it depends on

pub mod chain;
pub mod notify;
pub mod swap;
pub mod wallet;
