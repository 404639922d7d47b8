use super::catalog::GameKind;
use super::choice::{OpponentChoice, Outcome, PlayerChoice};
use super::session::{OpponentMode, Phase, Session, Wager};
use serde::{Deserialize, Serialize};

/// Read-only view of a session, re-sent to the presentation layer after every transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub game: Option<GameKind>,
    pub wager: Wager,
    pub pot: Option<String>,
    pub opponent_mode: OpponentMode,
    pub opponent_label: String,
    pub player_choice: Option<PlayerChoice>,
    pub player_display: Option<String>,
    pub opponent_choice: Option<OpponentChoice>,
    pub opponent_display: Option<String>,
    pub outcome: Option<Outcome>,
    pub winnings: Option<String>,
    pub countdown: Option<u8>,
    pub quick_draw_armed: bool,
    pub round: u64,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        let wager = session.wager().clone();
        let winnings = (session.outcome() == Some(Outcome::Win))
            .then(|| format!("+{} {}", wager.amount, wager.token));

        Self {
            phase: session.phase(),
            game: session.selected_game(),
            pot: wager.pot(),
            opponent_mode: session.opponent_mode(),
            opponent_label: session.opponent_mode().label().to_string(),
            player_choice: session.player_choice(),
            player_display: session.player_choice().map(|c| c.to_string()),
            opponent_choice: session.opponent_choice(),
            opponent_display: session.opponent_choice().map(|c| c.to_string()),
            outcome: session.outcome(),
            winnings,
            countdown: session.countdown(),
            quick_draw_armed: session.quick_draw_armed(),
            round: session.round(),
            wager,
        }
    }
}
