use super::catalog::{GameKind, Token};
use super::choice::{OpponentChoice, Outcome, PlayerChoice, RawChoice};
use super::random::RandomSource;
use super::rules::{InputError, rules_for};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Countdown ticks between a submit and resolution
pub const COUNTDOWN_TICKS: u8 = 3;
/// Quick-draw only waits a single tick once the reaction is recorded
pub const QUICK_DRAW_TICKS: u8 = 1;
/// Delay before the quick-draw "go" signal, in milliseconds
pub const GO_SIGNAL_DELAY_MS: Range<u32> = 2000..5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No game selected
    #[serde(rename = "lobby-top")]
    Lobby,
    WagerSetup,
    Playing,
    Result,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentMode {
    #[default]
    Ai,
    Human,
}

impl OpponentMode {
    pub fn label(self) -> &'static str {
        match self {
            OpponentMode::Ai => "AI",
            OpponentMode::Human => "Opponent",
        }
    }
}

/// Cosmetic stake. The amount is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    pub amount: String,
    pub token: Token,
}

impl Default for Wager {
    fn default() -> Self {
        Self {
            amount: "0.1".to_string(),
            token: Token::default(),
        }
    }
}

impl Wager {
    /// Accepts non-negative decimal strings such as `1`, `0.5` or `.25`
    pub fn new(amount: &str, token: Token) -> Result<Self, InputError> {
        let amount = amount.trim();
        let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());

        if whole.len() + fraction.len() == 0 || !digits_only(whole) || !digits_only(fraction) {
            return Err(InputError::InvalidWager(amount.to_string()));
        }

        Ok(Self {
            amount: amount.to_string(),
            token,
        })
    }

    /// Both stakes together. Doubled digit by digit so any typed amount stays exact.
    pub fn pot(&self) -> Option<String> {
        let (whole, fraction) = self
            .amount
            .split_once('.')
            .unwrap_or((self.amount.as_str(), ""));
        let digits = whole
            .bytes()
            .chain(fraction.bytes())
            .map(|b| b.is_ascii_digit().then(|| b - b'0'))
            .collect::<Option<Vec<u8>>>()?;
        if digits.is_empty() {
            return None;
        }

        let mut doubled = Vec::with_capacity(digits.len() + 1);
        let mut carry = 0;
        for digit in digits.iter().rev() {
            let value = digit * 2 + carry;
            doubled.push(char::from(b'0' + value % 10));
            carry = value / 10;
        }
        doubled.push(char::from(b'0' + carry));
        doubled.reverse();

        let split = doubled.len() - fraction.len();
        let whole: String = doubled[..split].iter().collect();
        let fraction: String = doubled[split..].iter().collect();
        let whole = match whole.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        let amount = match fraction.trim_end_matches('0') {
            "" => whole.to_string(),
            trimmed => format!("{whole}.{trimmed}"),
        };
        Some(format!("{amount} {}", self.token))
    }
}

/// Everything the session reacts to: user intents and its own timers
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectGame(GameKind),
    Back,
    SetOpponentMode(OpponentMode),
    SetWager { amount: String, token: Token },
    Start,
    Submit(RawChoice),
    Rematch,
    NewGame,
    Timer(TimerEvent),
}

/// Timer firings, stamped with the round they were scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    CountdownTick { round: u64 },
    GoSignal { round: u64 },
}

impl TimerEvent {
    pub fn round(self) -> u64 {
        match self {
            TimerEvent::CountdownTick { round } | TimerEvent::GoSignal { round } => round,
        }
    }
}

/// Side effects the engine performs after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    CancelTimers,
    ScheduleTick { round: u64 },
    ScheduleGoSignal { round: u64, delay: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("countdown for {0} finished without a player choice")]
    MissingPlayerInput(GameKind),
    #[error("{game} cannot resolve {choice:?}")]
    ChoiceMismatch { game: GameKind, choice: PlayerChoice },
}

/// One player's arena session (pure state, no I/O)
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    selected_game: Option<GameKind>,
    phase: Phase,
    wager: Wager,
    opponent_mode: OpponentMode,
    player_choice: Option<PlayerChoice>,
    opponent_choice: Option<OpponentChoice>,
    outcome: Option<Outcome>,
    countdown: Option<u8>,
    quick_draw_signal_at: Option<Instant>,
    round: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            selected_game: None,
            phase: Phase::Lobby,
            wager: Wager::default(),
            opponent_mode: OpponentMode::default(),
            player_choice: None,
            opponent_choice: None,
            outcome: None,
            countdown: None,
            quick_draw_signal_at: None,
            round: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_game(&self) -> Option<GameKind> {
        self.selected_game
    }

    pub fn wager(&self) -> &Wager {
        &self.wager
    }

    pub fn opponent_mode(&self) -> OpponentMode {
        self.opponent_mode
    }

    pub fn player_choice(&self) -> Option<PlayerChoice> {
        self.player_choice
    }

    pub fn opponent_choice(&self) -> Option<OpponentChoice> {
        self.opponent_choice
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    /// True once the quick-draw "go" signal has fired this round
    pub fn quick_draw_armed(&self) -> bool {
        self.quick_draw_signal_at.is_some()
    }

    /// Generation token; bumped whenever a round starts or is abandoned
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Apply one intent. `Ok(None)` means the intent does not apply in the current phase.
    pub fn apply(
        &self,
        intent: Intent,
        now: Instant,
        random: &mut dyn RandomSource,
    ) -> Result<Option<Transition>, SessionError> {
        match (self.phase, intent) {
            (Phase::Lobby, Intent::SelectGame(game)) => Ok(Some(Transition::to(Session {
                selected_game: Some(game),
                phase: Phase::WagerSetup,
                ..self.clone()
            }))),
            (Phase::WagerSetup, Intent::SetOpponentMode(mode)) => {
                Ok(Some(Transition::to(Session {
                    opponent_mode: mode,
                    ..self.clone()
                })))
            }
            (Phase::WagerSetup, Intent::SetWager { amount, token }) => {
                let wager = Wager::new(&amount, token)?;
                Ok(Some(Transition::to(Session {
                    wager,
                    ..self.clone()
                })))
            }
            (Phase::WagerSetup, Intent::Start) | (Phase::Result, Intent::Rematch) => {
                Ok(self.begin_round(random))
            }
            (Phase::WagerSetup | Phase::Playing | Phase::Result, Intent::Back) => {
                Ok(Some(self.back_to_lobby()))
            }
            (Phase::Result, Intent::NewGame) => Ok(Some(
                Transition::to(Session {
                    round: self.round + 1,
                    ..Session::new()
                })
                .with(Effect::CancelTimers),
            )),
            (Phase::Playing, Intent::Submit(raw)) => self.submit(&raw, now),
            (Phase::Playing, Intent::Timer(event)) if event.round() == self.round => match event {
                TimerEvent::CountdownTick { .. } => self.tick(random),
                TimerEvent::GoSignal { .. } => Ok(self.fire_go_signal(now)),
            },
            _ => Ok(None),
        }
    }

    fn begin_round(&self, random: &mut dyn RandomSource) -> Option<Transition> {
        let game = self.selected_game?;
        let next = Session {
            phase: Phase::Playing,
            player_choice: None,
            opponent_choice: None,
            outcome: None,
            countdown: None,
            quick_draw_signal_at: None,
            round: self.round + 1,
            ..self.clone()
        };
        let round = next.round;
        let transition = Transition::to(next).with(Effect::CancelTimers);

        if game != GameKind::QuickDraw {
            return Some(transition);
        }

        let delay = Duration::from_millis(random.pick(GO_SIGNAL_DELAY_MS).into());
        Some(transition.with(Effect::ScheduleGoSignal { round, delay }))
    }

    /// Leaves the arena but keeps the wager settings for the next game
    fn back_to_lobby(&self) -> Transition {
        Transition::to(Session {
            wager: self.wager.clone(),
            opponent_mode: self.opponent_mode,
            round: self.round + 1,
            ..Session::new()
        })
        .with(Effect::CancelTimers)
    }

    fn submit(&self, raw: &RawChoice, now: Instant) -> Result<Option<Transition>, SessionError> {
        // One submission per round, and never while a countdown is running
        if self.player_choice.is_some() || self.countdown.is_some() {
            return Ok(None);
        }
        let Some(game) = self.selected_game else {
            return Ok(None);
        };
        let choice = rules_for(game).validate_input(raw)?;

        if game != GameKind::QuickDraw {
            return Ok(Some(self.start_countdown(choice, COUNTDOWN_TICKS)));
        }

        let Some(signal_at) = self.quick_draw_signal_at else {
            return Ok(Some(
                Transition::to(Session {
                    phase: Phase::Result,
                    player_choice: Some(PlayerChoice::EarlyDraw),
                    outcome: Some(Outcome::Lose),
                    ..self.clone()
                })
                .with(Effect::CancelTimers),
            ));
        };

        let reaction = now.saturating_duration_since(signal_at);
        let us = u64::try_from(reaction.as_micros()).unwrap_or(u64::MAX);
        Ok(Some(self.start_countdown(
            PlayerChoice::Reaction { us },
            QUICK_DRAW_TICKS,
        )))
    }

    fn start_countdown(&self, choice: PlayerChoice, ticks: u8) -> Transition {
        Transition::to(Session {
            player_choice: Some(choice),
            countdown: Some(ticks),
            ..self.clone()
        })
        .with(Effect::ScheduleTick { round: self.round })
    }

    fn fire_go_signal(&self, now: Instant) -> Option<Transition> {
        if self.selected_game != Some(GameKind::QuickDraw)
            || self.quick_draw_signal_at.is_some()
            || self.player_choice.is_some()
        {
            return None;
        }
        Some(Transition::to(Session {
            quick_draw_signal_at: Some(now),
            ..self.clone()
        }))
    }

    fn tick(&self, random: &mut dyn RandomSource) -> Result<Option<Transition>, SessionError> {
        let (Some(remaining), Some(game)) = (self.countdown, self.selected_game) else {
            return Ok(None);
        };

        match remaining.saturating_sub(1) {
            0 => self.resolve(game, random).map(Some),
            left => Ok(Some(
                Transition::to(Session {
                    countdown: Some(left),
                    ..self.clone()
                })
                .with(Effect::ScheduleTick { round: self.round }),
            )),
        }
    }

    /// Countdown reached zero: consume it and settle the round
    fn resolve(
        &self,
        game: GameKind,
        random: &mut dyn RandomSource,
    ) -> Result<Transition, SessionError> {
        let choice = self
            .player_choice
            .ok_or(SessionError::MissingPlayerInput(game))?;
        let resolution = rules_for(game)
            .resolve(&choice, random)
            .ok_or(SessionError::ChoiceMismatch { game, choice })?;

        Ok(Transition::to(Session {
            phase: Phase::Result,
            player_choice: Some(resolution.player),
            opponent_choice: Some(resolution.opponent),
            outcome: Some(resolution.outcome),
            countdown: None,
            ..self.clone()
        }))
    }
}

#[cfg(test)]
impl Session {
    /// A countdown running with no recorded choice, which normal play never produces
    pub(crate) fn stalled_round(game: GameKind) -> Self {
        Session {
            phase: Phase::Playing,
            selected_game: Some(game),
            countdown: Some(1),
            round: 1,
            ..Session::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::core::choice::{CoinSide, Hand};
    use crate::game::core::random::{ScriptedRandom, SeededRandom};

    fn apply(session: &Session, intent: Intent, draws: &[u32]) -> Option<Transition> {
        let mut random = ScriptedRandom::new(draws.iter().copied());
        session.apply(intent, Instant::now(), &mut random).unwrap()
    }

    fn step(session: &Session, intent: Intent, draws: &[u32]) -> Session {
        apply(session, intent, draws)
            .expect("intent should apply")
            .session
    }

    fn playing(game: GameKind) -> Session {
        let session = step(&Session::new(), Intent::SelectGame(game), &[]);
        let draws: &[u32] = if game == GameKind::QuickDraw { &[3000] } else { &[] };
        step(&session, Intent::Start, draws)
    }

    fn tick(session: &Session) -> Intent {
        Intent::Timer(TimerEvent::CountdownTick {
            round: session.round(),
        })
    }

    fn invariants_hold(session: &Session) -> bool {
        let lobby = (session.selected_game.is_none()) == (session.phase == Phase::Lobby);
        let choice = session.player_choice.is_none()
            || matches!(session.phase, Phase::Playing | Phase::Result);
        let outcome = session.outcome.is_some() == (session.phase == Phase::Result);
        lobby && choice && outcome
    }

    #[test]
    fn selecting_a_game_moves_to_wager_setup() {
        let session = step(&Session::new(), Intent::SelectGame(GameKind::Dice), &[]);

        assert_eq!(session.phase(), Phase::WagerSetup);
        assert_eq!(session.selected_game(), Some(GameKind::Dice));
        assert!(apply(&session, Intent::SelectGame(GameKind::CoinFlip), &[]).is_none());
    }

    #[test]
    fn back_from_setup_returns_to_lobby() {
        let session = step(&Session::new(), Intent::SelectGame(GameKind::Dice), &[]);
        let session = step(&session, Intent::Back, &[]);

        assert_eq!(session.phase(), Phase::Lobby);
        assert_eq!(session.selected_game(), None);
        assert!(apply(&session, Intent::Back, &[]).is_none());
    }

    #[test]
    fn intents_for_other_phases_are_ignored() {
        let lobby = Session::new();
        assert!(apply(&lobby, Intent::Start, &[]).is_none());
        assert!(apply(&lobby, Intent::Submit("rock".into()), &[]).is_none());
        assert!(apply(&lobby, Intent::Rematch, &[]).is_none());

        let setup = step(&lobby, Intent::SelectGame(GameKind::RockPaperScissors), &[]);
        assert!(apply(&setup, Intent::Submit("rock".into()), &[]).is_none());
        assert!(apply(&setup, Intent::NewGame, &[]).is_none());
        assert!(apply(&setup, tick(&setup), &[]).is_none());
    }

    #[test]
    fn wager_and_opponent_mode_are_set_in_setup() {
        let session = step(&Session::new(), Intent::SelectGame(GameKind::Dice), &[]);
        let session = step(&session, Intent::SetOpponentMode(OpponentMode::Human), &[]);
        let session = step(
            &session,
            Intent::SetWager {
                amount: "0.5".to_string(),
                token: Token::Sol,
            },
            &[],
        );

        assert_eq!(session.opponent_mode(), OpponentMode::Human);
        assert_eq!(session.wager().amount, "0.5");
        assert_eq!(session.wager().token, Token::Sol);
        assert_eq!(session.wager().pot().as_deref(), Some("1 SOL"));
    }

    #[test]
    fn invalid_wager_is_rejected() {
        let session = step(&Session::new(), Intent::SelectGame(GameKind::Dice), &[]);
        let mut random = ScriptedRandom::new([]);

        for amount in ["", "abc", "1.2.3", "-1", "."] {
            let result = session.apply(
                Intent::SetWager {
                    amount: amount.to_string(),
                    token: Token::Eth,
                },
                Instant::now(),
                &mut random,
            );
            assert!(
                matches!(result, Err(SessionError::InvalidInput(InputError::InvalidWager(_)))),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn pot_doubles_the_typed_amount_exactly() {
        let pot = |amount: &str| Wager::new(amount, Token::Eth).unwrap().pot().unwrap();

        assert_eq!(pot("0.1"), "0.2 ETH");
        assert_eq!(pot("0.05"), "0.1 ETH");
        assert_eq!(pot("2.5"), "5 ETH");
        assert_eq!(pot(".25"), "0.5 ETH");
        assert_eq!(pot("10."), "20 ETH");
        assert_eq!(pot("0"), "0 ETH");
        assert_eq!(pot("12345678901234567891"), "24691357802469135782 ETH");

        let huge = "9".repeat(400);
        assert_eq!(pot(&huge), format!("1{}8 ETH", "9".repeat(399)));
    }

    #[test]
    fn wager_accepts_plain_decimals() {
        for amount in ["1", "0.01", "1.0", ".25", "10."] {
            assert!(Wager::new(amount, Token::Eth).is_ok(), "{amount:?}");
        }
    }

    #[test]
    fn start_bumps_round_and_cancels_old_timers() {
        let setup = step(&Session::new(), Intent::SelectGame(GameKind::Dice), &[]);
        let transition = apply(&setup, Intent::Start, &[]).unwrap();

        assert_eq!(transition.session.phase(), Phase::Playing);
        assert_eq!(transition.session.round(), setup.round() + 1);
        assert_eq!(transition.effects, vec![Effect::CancelTimers]);
    }

    #[test]
    fn quick_draw_start_schedules_go_signal() {
        let setup = step(&Session::new(), Intent::SelectGame(GameKind::QuickDraw), &[]);
        let transition = apply(&setup, Intent::Start, &[3500]).unwrap();
        let round = transition.session.round();

        assert_eq!(
            transition.effects,
            vec![
                Effect::CancelTimers,
                Effect::ScheduleGoSignal {
                    round,
                    delay: Duration::from_millis(3500)
                }
            ]
        );
        assert!(!transition.session.quick_draw_armed());
    }

    #[test]
    fn submit_starts_three_tick_countdown() {
        let session = playing(GameKind::RockPaperScissors);
        let transition = apply(&session, Intent::Submit("paper".into()), &[]).unwrap();

        assert_eq!(transition.session.player_choice(), Some(PlayerChoice::Hand(Hand::Paper)));
        assert_eq!(transition.session.countdown(), Some(COUNTDOWN_TICKS));
        assert_eq!(
            transition.effects,
            vec![Effect::ScheduleTick {
                round: session.round()
            }]
        );
    }

    #[test]
    fn second_submit_is_ignored() {
        let session = playing(GameKind::CoinFlip);
        let session = step(&session, Intent::Submit("heads".into()), &[]);

        assert!(apply(&session, Intent::Submit("tails".into()), &[]).is_none());
        assert_eq!(session.player_choice(), Some(PlayerChoice::Coin(CoinSide::Heads)));
    }

    #[test]
    fn invalid_guess_leaves_session_untouched() {
        let session = playing(GameKind::NumberGuess);
        let mut random = ScriptedRandom::new([]);

        let result = session.apply(Intent::Submit(RawChoice::Integer(101)), Instant::now(), &mut random);

        assert_eq!(
            result,
            Err(SessionError::InvalidInput(InputError::OutOfRange(101)))
        );
        assert_eq!(session.player_choice(), None);
        assert_eq!(session.countdown(), None);
    }

    #[test]
    fn countdown_ticks_down_then_resolves_once() {
        let session = playing(GameKind::Dice);
        let session = step(&session, Intent::Submit("roll".into()), &[]);

        let session = step(&session, tick(&session), &[]);
        assert_eq!(session.countdown(), Some(2));
        let session = step(&session, tick(&session), &[]);
        assert_eq!(session.countdown(), Some(1));

        let transition = apply(&session, tick(&session), &[6, 3]).unwrap();
        assert!(transition.effects.is_empty());
        let session = transition.session;

        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.countdown(), None);
        assert_eq!(session.player_choice(), Some(PlayerChoice::Rolled(6)));
        assert_eq!(session.opponent_choice(), Some(OpponentChoice::Roll(3)));
        assert_eq!(session.outcome(), Some(Outcome::Win));

        assert!(apply(&session, tick(&session), &[]).is_none());
    }

    #[test]
    fn number_guess_scenario() {
        let session = playing(GameKind::NumberGuess);
        let mut session = step(&session, Intent::Submit(RawChoice::Integer(48)), &[]);
        for _ in 0..2 {
            session = step(&session, tick(&session), &[]);
        }
        let session = step(&session, tick(&session), &[50, 55]);

        assert_eq!(session.outcome(), Some(Outcome::Win));
        assert_eq!(
            session.opponent_choice().map(|c| c.to_string()).as_deref(),
            Some("Target: 50, AI: 55")
        );
    }

    #[test]
    fn stale_tick_is_ignored() {
        let session = playing(GameKind::Dice);
        let session = step(&session, Intent::Submit("roll".into()), &[]);
        let stale = Intent::Timer(TimerEvent::CountdownTick {
            round: session.round() - 1,
        });

        assert!(apply(&session, stale, &[]).is_none());
    }

    #[test]
    fn quick_draw_early_press_loses_without_countdown() {
        let session = playing(GameKind::QuickDraw);
        let transition = apply(&session, Intent::Submit("draw".into()), &[]).unwrap();

        assert_eq!(transition.session.phase(), Phase::Result);
        assert_eq!(transition.session.outcome(), Some(Outcome::Lose));
        assert_eq!(transition.session.player_choice(), Some(PlayerChoice::EarlyDraw));
        assert_eq!(transition.session.countdown(), None);
        assert_eq!(transition.effects, vec![Effect::CancelTimers]);

        // The canceled signal arriving late changes nothing
        let late = Intent::Timer(TimerEvent::GoSignal {
            round: transition.session.round(),
        });
        assert!(apply(&transition.session, late, &[]).is_none());
    }

    #[test]
    fn quick_draw_reaction_is_measured_from_signal() {
        let session = playing(GameKind::QuickDraw);
        let mut random = ScriptedRandom::new([]);
        let signal_at = Instant::now();

        let go = Intent::Timer(TimerEvent::GoSignal {
            round: session.round(),
        });
        let session = session
            .apply(go, signal_at, &mut random)
            .unwrap()
            .unwrap()
            .session;
        assert!(session.quick_draw_armed());

        let pressed_at = signal_at + Duration::from_millis(180);
        let transition = session
            .apply(Intent::Submit("draw".into()), pressed_at, &mut random)
            .unwrap()
            .unwrap();
        let session = transition.session;

        assert_eq!(session.player_choice(), Some(PlayerChoice::Reaction { us: 180_000 }));
        assert_eq!(session.countdown(), Some(QUICK_DRAW_TICKS));

        let session = step(&session, tick(&session), &[250_000]);
        assert_eq!(session.outcome(), Some(Outcome::Win));
        assert_eq!(session.opponent_choice(), Some(OpponentChoice::Reaction { us: 250_000 }));
    }

    #[test]
    fn quick_draw_sub_millisecond_slower_reaction_loses() {
        let session = playing(GameKind::QuickDraw);
        let mut random = ScriptedRandom::new([]);
        let signal_at = Instant::now();

        let go = Intent::Timer(TimerEvent::GoSignal {
            round: session.round(),
        });
        let session = session
            .apply(go, signal_at, &mut random)
            .unwrap()
            .unwrap()
            .session;

        let pressed_at = signal_at + Duration::from_micros(200_900);
        let session = session
            .apply(Intent::Submit("draw".into()), pressed_at, &mut random)
            .unwrap()
            .unwrap()
            .session;
        assert_eq!(session.player_choice(), Some(PlayerChoice::Reaction { us: 200_900 }));

        let slower = step(&session, tick(&session), &[200_000]);
        assert_eq!(slower.outcome(), Some(Outcome::Lose));

        let faster = step(&session, tick(&session), &[200_901]);
        assert_eq!(faster.outcome(), Some(Outcome::Win));

        let tied = step(&session, tick(&session), &[200_900]);
        assert_eq!(tied.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn rematch_keeps_game_and_wager() {
        let setup = step(&Session::new(), Intent::SelectGame(GameKind::CoinFlip), &[]);
        let setup = step(
            &setup,
            Intent::SetWager {
                amount: "1.0".to_string(),
                token: Token::Pepe,
            },
            &[],
        );
        let mut session = step(&setup, Intent::Start, &[]);
        session = step(&session, Intent::Submit("heads".into()), &[]);
        for _ in 0..2 {
            session = step(&session, tick(&session), &[]);
        }
        let result = step(&session, tick(&session), &[0]);
        assert_eq!(result.outcome(), Some(Outcome::Win));

        let rematch = step(&result, Intent::Rematch, &[]);
        assert_eq!(rematch.phase(), Phase::Playing);
        assert_eq!(rematch.selected_game(), Some(GameKind::CoinFlip));
        assert_eq!(rematch.wager(), result.wager());
        assert_eq!(rematch.player_choice(), None);
        assert_eq!(rematch.opponent_choice(), None);
        assert_eq!(rematch.outcome(), None);
        assert!(rematch.round() > result.round());
    }

    #[test]
    fn new_game_resets_to_lobby() {
        let session = playing(GameKind::RockPaperScissors);
        let mut session = step(&session, Intent::Submit("rock".into()), &[]);
        for _ in 0..2 {
            session = step(&session, tick(&session), &[]);
        }
        let result = step(&session, tick(&session), &[2]);
        assert_eq!(result.outcome(), Some(Outcome::Win));

        let transition = apply(&result, Intent::NewGame, &[]).unwrap();
        assert_eq!(transition.session.phase(), Phase::Lobby);
        assert_eq!(transition.session.selected_game(), None);
        assert_eq!(transition.session.outcome(), None);
        assert!(transition.session.round() > result.round());
        assert_eq!(transition.effects, vec![Effect::CancelTimers]);
    }

    #[test]
    fn back_while_playing_cancels_round() {
        let session = playing(GameKind::QuickDraw);
        let transition = apply(&session, Intent::Back, &[]).unwrap();

        assert_eq!(transition.session.phase(), Phase::Lobby);
        assert_eq!(transition.effects, vec![Effect::CancelTimers]);

        let late = Intent::Timer(TimerEvent::GoSignal {
            round: session.round(),
        });
        assert!(apply(&transition.session, late, &[]).is_none());
    }

    #[test]
    fn resolving_without_choice_is_an_error() {
        let broken = Session::stalled_round(GameKind::Dice);
        let mut random = ScriptedRandom::new([]);

        let result = broken.apply(tick(&broken), Instant::now(), &mut random);

        assert_eq!(result, Err(SessionError::MissingPlayerInput(GameKind::Dice)));
    }

    #[test]
    fn invariants_survive_random_intent_sequences() {
        let mut random = SeededRandom::seeded(2024);
        let intents = |session: &Session| {
            vec![
                Intent::SelectGame(GameKind::ALL[(session.round() % 6) as usize]),
                Intent::Back,
                Intent::Start,
                Intent::Submit("rock".into()),
                Intent::Submit("roll".into()),
                Intent::Submit("draw".into()),
                Intent::Submit(RawChoice::Integer(37)),
                Intent::Timer(TimerEvent::GoSignal {
                    round: session.round(),
                }),
                tick(session),
                Intent::Rematch,
                Intent::NewGame,
            ]
        };

        let mut session = Session::new();
        for i in 0..2000 {
            let options = intents(&session);
            let intent = options[random.pick(0..options.len() as u32) as usize].clone();
            match session.apply(intent, Instant::now(), &mut random) {
                Ok(Some(transition)) => session = transition.session,
                Ok(None) | Err(SessionError::InvalidInput(_)) => {}
                Err(err) => panic!("step {i}: {err}"),
            }
            assert!(invariants_hold(&session), "step {i}: {session:?}");
        }
    }
}
