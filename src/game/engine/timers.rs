use crate::game::core::session::{Intent, TimerEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// One-shot timers that post their event back into a session's inbox.
/// Timers only hold a weak sender, so a closed session is never kept alive by them.
pub struct Timers {
    inbox: mpsc::WeakSender<Intent>,
    pending: Vec<JoinHandle<()>>,
}

impl Timers {
    pub fn new(inbox: mpsc::WeakSender<Intent>) -> Self {
        Self {
            inbox,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, after: Duration, event: TimerEvent) {
        self.pending.retain(|handle| !handle.is_finished());

        let inbox = self.inbox.clone();
        debug!(?event, ?after, "Scheduling timer");
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let Some(inbox) = inbox.upgrade() else {
                return;
            };
            let _ = inbox.send(Intent::Timer(event)).await;
        }));
    }

    pub fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }

    /// Timers scheduled and not yet fired or canceled
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|handle| !handle.is_finished()).count()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
