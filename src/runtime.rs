//! Async plumbing around the synchronous store.
//!
//! The store itself has no notion of in-flight work. Latency and timers live
//! here: a task waits, then takes the lock and runs one command to completion.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};

use crate::model::{MessageId, ProfileId, RoomId, Upload};
use crate::AppStore;

pub type SharedStore = Arc<Mutex<AppStore>>;

pub fn shared(store: AppStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Idle time after the last keystroke before a typer is cleared.
pub const TYPING_IDLE: Duration = Duration::from_secs(2);

/// A plausible network round trip: 100 to 300 ms.
pub fn simulated_latency() -> Duration {
    Duration::from_millis(rand::rng().random_range(100..300))
}

/// Waits `latency`, then sends through the store, recording how long the
/// send took in milliseconds.
pub async fn send_with_latency(
    store: &SharedStore,
    content: impl Into<String>,
    files: Vec<Upload>,
    latency: Duration,
) -> Option<MessageId> {
    let started = Instant::now();
    sleep(latency).await;
    let took = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    store.lock().await.send_message(content, files, Some(took))
}

/// Keeps one pending "clear typing" timer per composer. Every keystroke
/// refreshes presence and re-arms the timer, so only the last one counts.
pub struct TypingDebouncer {
    store: SharedStore,
    idle: Duration,
    pending: Option<JoinHandle<()>>,
}

impl TypingDebouncer {
    pub fn new(store: SharedStore, idle: Duration) -> Self {
        Self {
            store,
            idle,
            pending: None,
        }
    }

    pub async fn keystroke(&mut self, room_id: RoomId, profile_id: ProfileId) {
        self.store.lock().await.set_typing(&room_id, &profile_id);
        self.cancel();

        let store = self.store.clone();
        let idle = self.idle;
        self.pending = Some(tokio::spawn(async move {
            sleep(idle).await;
            store.lock().await.clear_typing(&room_id, &profile_id);
        }));
    }

    /// Drops the pending timer without clearing presence.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Periodically prunes stale typing entries until the handle is aborted.
pub fn spawn_typing_sweeper(store: SharedStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            store.lock().await.sweep_typing(OffsetDateTime::now_utc());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_stays_in_range() {
        for _ in 0..32 {
            let latency = simulated_latency();
            assert!(latency >= Duration::from_millis(100) && latency < Duration::from_millis(300));
        }
    }
}
