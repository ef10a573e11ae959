use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use zoner_logging::zoner_trace;

use crate::{EngineEvent, TimerId};

/// One-shot quiet-period timers running on a tokio runtime.
///
/// Each expiry is reported as `EngineEvent::TimerFired`. Canceling aborts the
/// sleeping task, so a canceled id is never reported unless it had already fired.
pub struct QuietTimers {
    runtime: Handle,
    events: mpsc::Sender<EngineEvent>,
    pending: HashMap<TimerId, JoinHandle<()>>,
}

impl QuietTimers {
    pub fn new(runtime: Handle, events: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            runtime,
            events,
            pending: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, timer: TimerId, delay: Duration) {
        self.pending.retain(|_, handle| !handle.is_finished());

        let events = self.events.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(EngineEvent::TimerFired(timer));
        });
        zoner_trace!("timer {} armed for {:?}", timer, delay);
        if let Some(previous) = self.pending.insert(timer, handle) {
            previous.abort();
        }
    }

    /// Returns whether a still-registered timer was aborted.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        match self.pending.remove(&timer) {
            Some(handle) => {
                handle.abort();
                zoner_trace!("timer {} canceled", timer);
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for QuietTimers {
    fn drop(&mut self) {
        for handle in self.pending.values() {
            handle.abort();
        }
    }
}
