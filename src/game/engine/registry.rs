use super::arena::{ArenaActor, ArenaHandle, DEFAULT_COUNTDOWN_TICK};
use crate::game::core::catalog::Catalog;
use crate::game::core::clock::{Clock, TokioClock};
use crate::game::core::messages::ServerMessage;
use crate::game::core::random::SeededRandom;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub countdown_tick: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            countdown_tick: DEFAULT_COUNTDOWN_TICK,
        }
    }
}

/// Tracks the live arena sessions, one per connection
pub struct ArenaState {
    config: ArenaConfig,
    catalog: Catalog,
    clock: Arc<dyn Clock>,
    sessions: DashMap<String, ArenaHandle>,
}

impl ArenaState {
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            catalog: Catalog::standard(),
            clock: Arc::new(TokioClock),
            sessions: DashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Spawn the arena for a new connection. Its snapshots go to `outbox`.
    pub fn open_session(
        &self,
        session_id: &str,
        outbox: broadcast::Sender<ServerMessage>,
    ) -> ArenaHandle {
        let (actor, handle) = ArenaActor::new(
            session_id,
            self.config.countdown_tick,
            outbox,
            Box::new(SeededRandom::from_os_rng()),
            self.clock.clone(),
        );
        tokio::spawn(actor.run());

        self.sessions.insert(session_id.to_string(), handle.clone());
        info!(session_id, live = self.sessions.len(), "Opened arena session");
        handle
    }

    /// Forget a session; the arena stops once the caller drops its handle too
    pub fn close_session(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            info!(session_id, live = self.sessions.len(), "Closed arena session");
        }
    }
}
