use super::catalog::GameKind;
use super::choice::{CoinSide, Hand, OpponentChoice, Outcome, Parity, PlayerChoice, RawChoice};
use super::random::RandomSource;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const DIE_FACES: RangeInclusive<u32> = 1..=6;
pub const ODD_EVEN_TOTALS: RangeInclusive<u32> = 1..=10;
pub const GUESS_RANGE: RangeInclusive<i64> = 1..=100;
/// Opponent reaction in microseconds, 200ms up to but excluding 500ms
pub const OPPONENT_REACTION_US: RangeInclusive<u32> = 200_000..=499_999;

/// A player input rejected before it can reach the resolver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{choice:?} is not a valid choice for {game}")]
    UnknownChoice { game: GameKind, choice: String },
    #[error("guess must be a whole number")]
    NotAnInteger,
    #[error("guess {0} is outside 1-100")]
    OutOfRange(i64),
    #[error("wager amount {0:?} is not a decimal number")]
    InvalidWager(String),
}

/// Result of resolving one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The player's value as it stands after resolution (dice rolls happen here)
    pub player: PlayerChoice,
    pub opponent: OpponentChoice,
    pub outcome: Outcome,
}

/// Per-game rule set
pub trait RoundRules: Send + Sync {
    /// Turn a raw submission into this game's choice, or reject it
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError>;

    /// Draw the opponent's response and decide the round.
    /// Returns None if `choice` does not belong to this game.
    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution>;
}

pub fn rules_for(kind: GameKind) -> &'static dyn RoundRules {
    match kind {
        GameKind::RockPaperScissors => &RockPaperScissors,
        GameKind::Dice => &DiceRoll,
        GameKind::CoinFlip => &CoinFlip,
        GameKind::QuickDraw => &QuickDraw,
        GameKind::OddEven => &OddEven,
        GameKind::NumberGuess => &NumberGuess,
    }
}

fn draw(random: &mut dyn RandomSource, range: RangeInclusive<u32>) -> u32 {
    random.pick(*range.start()..*range.end() + 1)
}

fn normalized_label(game: GameKind, raw: &RawChoice) -> Result<String, InputError> {
    match raw {
        RawChoice::Label(label) => Ok(label.trim().to_ascii_lowercase()),
        RawChoice::Integer(n) => Err(unknown(game, n.to_string())),
        RawChoice::Decimal(n) => Err(unknown(game, n.to_string())),
    }
}

fn unknown(game: GameKind, choice: impl Into<String>) -> InputError {
    InputError::UnknownChoice {
        game,
        choice: choice.into(),
    }
}

fn parse_label<T>(
    game: GameKind,
    raw: &RawChoice,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, InputError> {
    let label = normalized_label(game, raw)?;
    parse(&label).ok_or_else(|| unknown(game, label))
}

fn expect_trigger(game: GameKind, raw: &RawChoice, trigger: &str) -> Result<(), InputError> {
    parse_label(game, raw, |label| (label == trigger).then_some(()))
}

pub struct RockPaperScissors;

impl RockPaperScissors {
    pub fn judge(player: Hand, opponent: Hand) -> Outcome {
        if player == opponent {
            Outcome::Draw
        } else {
            Outcome::win_if(player.beats(opponent))
        }
    }
}

impl RoundRules for RockPaperScissors {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        parse_label(GameKind::RockPaperScissors, raw, Hand::from_label).map(PlayerChoice::Hand)
    }

    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        let PlayerChoice::Hand(player) = *choice else {
            return None;
        };
        let opponent = Hand::ALL[random.pick(0..3) as usize];
        Some(Resolution {
            player: *choice,
            opponent: OpponentChoice::Hand(opponent),
            outcome: Self::judge(player, opponent),
        })
    }
}

pub struct DiceRoll;

impl RoundRules for DiceRoll {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        expect_trigger(GameKind::Dice, raw, "roll").map(|()| PlayerChoice::Roll)
    }

    /// The player's die is rolled first, then the opponent's
    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        if *choice != PlayerChoice::Roll {
            return None;
        }
        let player = draw(random, DIE_FACES) as u8;
        let opponent = draw(random, DIE_FACES) as u8;
        Some(Resolution {
            player: PlayerChoice::Rolled(player),
            opponent: OpponentChoice::Roll(opponent),
            outcome: Outcome::higher_wins(player, opponent),
        })
    }
}

pub struct CoinFlip;

impl RoundRules for CoinFlip {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        parse_label(GameKind::CoinFlip, raw, CoinSide::from_label).map(PlayerChoice::Coin)
    }

    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        let PlayerChoice::Coin(call) = *choice else {
            return None;
        };
        let landed = CoinSide::ALL[random.pick(0..2) as usize];
        Some(Resolution {
            player: *choice,
            opponent: OpponentChoice::Coin(landed),
            outcome: Outcome::win_if(call == landed),
        })
    }
}

pub struct QuickDraw;

impl RoundRules for QuickDraw {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        expect_trigger(GameKind::QuickDraw, raw, "draw").map(|()| PlayerChoice::Draw)
    }

    /// Only a measured reaction can be resolved; an early draw is settled by the session
    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        let PlayerChoice::Reaction { us } = *choice else {
            return None;
        };
        let opponent_us = u64::from(draw(random, OPPONENT_REACTION_US));
        Some(Resolution {
            player: *choice,
            opponent: OpponentChoice::Reaction { us: opponent_us },
            outcome: Outcome::lower_wins(us, opponent_us),
        })
    }
}

pub struct OddEven;

impl RoundRules for OddEven {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        parse_label(GameKind::OddEven, raw, Parity::from_label).map(PlayerChoice::Parity)
    }

    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        let PlayerChoice::Parity(call) = *choice else {
            return None;
        };
        let total = draw(random, ODD_EVEN_TOTALS) as u8;
        Some(Resolution {
            player: *choice,
            opponent: OpponentChoice::Total(total),
            outcome: Outcome::win_if(Parity::of(total) == call),
        })
    }
}

pub struct NumberGuess;

impl NumberGuess {
    pub fn judge(player: u8, opponent: u8, target: u8) -> Outcome {
        Outcome::lower_wins(player.abs_diff(target), opponent.abs_diff(target))
    }
}

impl RoundRules for NumberGuess {
    fn validate_input(&self, raw: &RawChoice) -> Result<PlayerChoice, InputError> {
        let value = match raw {
            RawChoice::Integer(n) => *n,
            RawChoice::Decimal(_) => return Err(InputError::NotAnInteger),
            RawChoice::Label(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| InputError::NotAnInteger)?,
        };
        if !GUESS_RANGE.contains(&value) {
            return Err(InputError::OutOfRange(value));
        }
        Ok(PlayerChoice::Guess(value as u8))
    }

    /// The hidden target is drawn first, then the opponent's guess
    fn resolve(&self, choice: &PlayerChoice, random: &mut dyn RandomSource) -> Option<Resolution> {
        let PlayerChoice::Guess(player) = *choice else {
            return None;
        };
        let target = random.pick(1..101) as u8;
        let guess = random.pick(1..101) as u8;
        Some(Resolution {
            player: *choice,
            opponent: OpponentChoice::Guess { target, guess },
            outcome: Self::judge(player, guess, target),
        })
    }
}
