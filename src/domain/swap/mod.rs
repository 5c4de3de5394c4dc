//! Swap domain - the swap widget and the values it derives

mod controller;
mod intent;
mod request;
mod slippage;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    ControllerEvent, QuoteRequest, SwapController, SwapDeps, SwapSettings, LABEL_CONNECT,
    LABEL_SWAP, LABEL_SWAPPING,
};
pub use intent::{Clock, ManualClock, SwapIntent, SystemClock, DEFAULT_DEADLINE_SECS};
pub use request::{Generation, RequestSlot};
pub use slippage::SlippageSettings;
pub use state::{SwapForm, SwapPhase, SwapSnapshot, SwapStats};
