//! Notification sinks

#[cfg(test)]
use parking_lot::Mutex;
use tracing::{error, info};

use crate::domain::notify::{Notification, NotificationLevel, NotificationSink};

/// Prints toasts to stdout and mirrors them into the log
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!(target: "toast", "{}", notification.message);
                println!("✅ {}", notification.message);
            }
            NotificationLevel::Error => {
                error!(target: "toast", "{}", notification.message);
                println!("❌ {}", notification.message);
            }
            NotificationLevel::Info => {
                info!(target: "toast", "{}", notification.message);
                println!("ℹ️  {}", notification.message);
            }
        }
    }
}

/// Keeps every notification, newest last
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received.lock().last().cloned()
    }
}

#[cfg(test)]
impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().push(notification);
    }
}
