use super::catalog::{Catalog, GameKind, Token};
use super::choice::RawChoice;
use super::session::{Intent, OpponentMode};
use super::snapshot::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Intents forwarded by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SelectGame { game: GameKind },
    Back,
    SetOpponentMode { mode: OpponentMode },
    SetWager { amount: String, token: Token },
    Start,
    Submit { choice: RawChoice },
    Rematch,
    NewGame,
}

impl From<ClientMessage> for Intent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::SelectGame { game } => Intent::SelectGame(game),
            ClientMessage::Back => Intent::Back,
            ClientMessage::SetOpponentMode { mode } => Intent::SetOpponentMode(mode),
            ClientMessage::SetWager { amount, token } => Intent::SetWager { amount, token },
            ClientMessage::Start => Intent::Start,
            ClientMessage::Submit { choice } => Intent::Submit(choice),
            ClientMessage::Rematch => Intent::Rematch,
            ClientMessage::NewGame => Intent::NewGame,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Catalog(Catalog),
    State { session: SessionSnapshot },
    InvalidInput { reason: String },
    Error { message: String },
}
