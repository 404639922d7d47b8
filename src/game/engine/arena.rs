use super::timers::Timers;
use crate::game::core::clock::Clock;
use crate::game::core::messages::ServerMessage;
use crate::game::core::random::RandomSource;
use crate::game::core::session::{Effect, Intent, Session, SessionError, TimerEvent};
use crate::game::core::snapshot::SessionSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info};

pub const DEFAULT_COUNTDOWN_TICK: Duration = Duration::from_secs(1);
const INBOX_CAPACITY: usize = 32;

/// Handle for feeding intents into a running arena
#[derive(Clone)]
pub struct ArenaHandle {
    sender: mpsc::Sender<Intent>,
}

impl ArenaHandle {
    /// Returns false once the arena has shut down
    pub async fn send(&self, intent: Intent) -> bool {
        self.sender.send(intent).await.is_ok()
    }

    /// Resolves once the arena has stopped
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

/// Owns one session and applies intents and timer firings strictly one at a time
pub struct ArenaActor {
    session_id: String,
    session: Session,
    inbox: mpsc::Receiver<Intent>,
    outbox: broadcast::Sender<ServerMessage>,
    timers: Timers,
    countdown_tick: Duration,
    random: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl ArenaActor {
    pub fn new(
        session_id: impl Into<String>,
        countdown_tick: Duration,
        outbox: broadcast::Sender<ServerMessage>,
        random: Box<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> (Self, ArenaHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            session_id: session_id.into(),
            session: Session::new(),
            inbox,
            outbox,
            timers: Timers::new(sender.downgrade()),
            countdown_tick,
            random,
            clock,
        };
        (actor, ArenaHandle { sender })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until every handle is dropped or the session hits a fatal error
    pub async fn run(mut self) {
        self.publish();

        while let Some(intent) = self.inbox.recv().await {
            if !self.handle(intent) {
                break;
            }
        }

        self.timers.cancel_all();
        info!(session_id = self.session_id, "Arena closed");
    }

    /// Apply one intent. Returns false if the session can't continue.
    pub fn handle(&mut self, intent: Intent) -> bool {
        let now = self.clock.now();
        debug!(session_id = self.session_id, ?intent, "Applying intent");

        match self.session.apply(intent, now, self.random.as_mut()) {
            Ok(Some(transition)) => {
                self.session = transition.session;
                for effect in transition.effects {
                    self.run_effect(effect);
                }
                self.publish();
                true
            }
            Ok(None) => {
                debug!(session_id = self.session_id, phase = ?self.session.phase(), "Intent ignored");
                true
            }
            Err(SessionError::InvalidInput(err)) => {
                debug!(session_id = self.session_id, %err, "Rejected input");
                let _ = self.outbox.send(ServerMessage::InvalidInput {
                    reason: err.to_string(),
                });
                true
            }
            Err(err) => {
                error!(session_id = self.session_id, %err, "Session failed");
                let _ = self.outbox.send(ServerMessage::Error {
                    message: "internal error, session closed".to_string(),
                });
                false
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CancelTimers => self.timers.cancel_all(),
            Effect::ScheduleTick { round } => self
                .timers
                .schedule(self.countdown_tick, TimerEvent::CountdownTick { round }),
            Effect::ScheduleGoSignal { round, delay } => {
                info!(session_id = self.session_id, round, ?delay, "Arming quick-draw signal");
                self.timers.schedule(delay, TimerEvent::GoSignal { round });
            }
        }
    }

    fn publish(&self) {
        let _ = self.outbox.send(ServerMessage::State {
            session: SessionSnapshot::from(&self.session),
        });
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}
