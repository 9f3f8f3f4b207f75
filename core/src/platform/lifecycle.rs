//! App-lifecycle event delivery
//!
//! The platform shell observes activity/app-state transitions and feeds them
//! into an `AppLifecycle`. The permission controller subscribes once at
//! construction and reacts to foreground transitions (the return leg of the
//! battery-settings excursion).

use tokio::sync::broadcast;

/// Channel depth for lifecycle fan-out. Transitions are rare; a small
/// buffer only matters if a subscriber stalls.
const LIFECYCLE_CHANNEL_CAPACITY: usize = 16;

/// App-level lifecycle transitions as reported by the platform shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The app became the foreground/active app
    Foregrounded,
    /// The app left the foreground
    Backgrounded,
}

/// Source of lifecycle events the controller can subscribe to
pub trait LifecycleEventSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent>;
}

/// Broadcast-backed lifecycle source driven by platform code
///
/// Platform code calls `notify_*` from its app-state callback; every
/// subscriber gets its own receiver.
pub struct AppLifecycle {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl AppLifecycle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LIFECYCLE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Report a lifecycle transition. Dropped silently when nobody listens.
    pub fn notify(&self, event: LifecycleEvent) {
        let _ = self.tx.send(event);
    }

    pub fn notify_foregrounded(&self) {
        self.notify(LifecycleEvent::Foregrounded);
    }

    pub fn notify_backgrounded(&self) {
        self.notify(LifecycleEvent::Backgrounded);
    }
}

impl Default for AppLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleEventSource for AppLifecycle {
    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }
}
