//! Generation-tagged in-flight requests

use std::fmt;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identity of one form state. Every derived request carries the
/// generation it was computed from; responses for any other generation
/// are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

struct InFlight {
    generation: Generation,
    handle: JoinHandle<()>,
}

/// At most one outstanding request of a kind. Starting a new one aborts
/// the previous task; the task handle is the cancellation token.
pub struct RequestSlot {
    label: &'static str,
    in_flight: Option<InFlight>,
}

impl RequestSlot {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            in_flight: None,
        }
    }

    pub fn start(&mut self, generation: Generation, handle: JoinHandle<()>) {
        self.cancel();
        debug!("{} request issued for {}", self.label, generation);
        self.in_flight = Some(InFlight { generation, handle });
    }

    /// Abort the outstanding request, if any
    pub fn cancel(&mut self) -> Option<Generation> {
        let in_flight = self.in_flight.take()?;
        in_flight.handle.abort();
        debug!("{} request for {} cancelled", self.label, in_flight.generation);
        Some(in_flight.generation)
    }

    /// Accept a response for `generation`. Returns false when the response
    /// does not belong to the outstanding request.
    pub fn complete(&mut self, generation: Generation) -> bool {
        match &self.in_flight {
            Some(in_flight) if in_flight.generation == generation => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_generation(&self) -> Option<Generation> {
        self.in_flight.as_ref().map(|f| f.generation)
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parked() -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn test_complete_matches_generation() {
        let mut slot = RequestSlot::new("quote");
        let g1 = Generation::default().next();
        slot.start(g1, parked());
        assert!(slot.is_pending());
        assert!(!slot.complete(g1.next()));
        assert!(slot.complete(g1));
        assert!(!slot.is_pending());
        assert!(!slot.complete(g1));
    }

    #[tokio::test]
    async fn test_start_aborts_previous_task() {
        let mut slot = RequestSlot::new("quote");
        let g1 = Generation::default().next();
        let (guard, dropped) = tokio::sync::oneshot::channel::<()>();
        let first = tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        slot.start(g1, first);
        slot.start(g1.next(), parked());
        // the sender is dropped only when the first task is torn down
        assert!(dropped.await.is_err());
        assert_eq!(slot.pending_generation(), Some(g1.next()));
    }

    #[tokio::test]
    async fn test_cancel_reports_generation() {
        let mut slot = RequestSlot::new("simulation");
        assert_eq!(slot.cancel(), None);
        let g = Generation::default().next().next();
        slot.start(g, parked());
        assert_eq!(slot.cancel(), Some(g));
        assert!(!slot.is_pending());
    }
}
