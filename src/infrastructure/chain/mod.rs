//! Swap contract implementations

pub mod mock_contract;

pub use mock_contract::MockSwapContract;
