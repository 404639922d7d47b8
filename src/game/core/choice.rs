use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "rock" => Some(Hand::Rock),
            "paper" => Some(Hand::Paper),
            "scissors" => Some(Hand::Scissors),
            _ => None,
        }
    }

    pub fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub const ALL: [CoinSide; 2] = [CoinSide::Heads, CoinSide::Tails];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "heads" => Some(CoinSide::Heads),
            "tails" => Some(CoinSide::Tails),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoinSide::Heads => "heads",
            CoinSide::Tails => "tails",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "odd" => Some(Parity::Odd),
            "even" => Some(Parity::Even),
            _ => None,
        }
    }

    pub fn of(value: u8) -> Self {
        if value % 2 == 1 { Parity::Odd } else { Parity::Even }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parity::Odd => "odd",
            Parity::Even => "even",
        }
    }
}

/// A choice as it arrives from the presentation layer, before any per-game validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChoice {
    Integer(i64),
    Decimal(f64),
    Label(String),
}

impl From<&str> for RawChoice {
    fn from(label: &str) -> Self {
        RawChoice::Label(label.to_string())
    }
}

impl From<i64> for RawChoice {
    fn from(value: i64) -> Self {
        RawChoice::Integer(value)
    }
}

/// What the player has committed to in the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PlayerChoice {
    Hand(Hand),
    Coin(CoinSide),
    Parity(Parity),
    Guess(u8),
    /// Dice trigger; the roll itself happens at resolution
    Roll,
    Rolled(u8),
    /// Quick-draw trigger, replaced by `Reaction` or `EarlyDraw` on submit
    Draw,
    /// Measured from the go signal, in microseconds
    Reaction { us: u64 },
    EarlyDraw,
}

impl fmt::Display for PlayerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerChoice::Hand(hand) => f.write_str(hand.label()),
            PlayerChoice::Coin(side) => f.write_str(side.label()),
            PlayerChoice::Parity(parity) => f.write_str(parity.label()),
            PlayerChoice::Guess(n) | PlayerChoice::Rolled(n) => write!(f, "{n}"),
            PlayerChoice::Roll => f.write_str("roll"),
            PlayerChoice::Draw => f.write_str("draw"),
            PlayerChoice::Reaction { us } => write_reaction(f, *us),
            PlayerChoice::EarlyDraw => f.write_str("too early"),
        }
    }
}

/// Reactions are compared in microseconds but shown rounded to the millisecond
fn write_reaction(f: &mut fmt::Formatter<'_>, us: u64) -> fmt::Result {
    write!(f, "{}ms", us.saturating_add(500) / 1000)
}

/// The opponent's side of a resolved round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OpponentChoice {
    Hand(Hand),
    Coin(CoinSide),
    Roll(u8),
    Reaction { us: u64 },
    Total(u8),
    /// Number-guess exposes the hidden target next to the opponent's guess
    Guess { target: u8, guess: u8 },
}

impl fmt::Display for OpponentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentChoice::Hand(hand) => f.write_str(hand.label()),
            OpponentChoice::Coin(side) => f.write_str(side.label()),
            OpponentChoice::Roll(n) => write!(f, "{n}"),
            OpponentChoice::Reaction { us } => write_reaction(f, *us),
            OpponentChoice::Total(n) => write!(f, "{n} ({})", Parity::of(*n).label()),
            OpponentChoice::Guess { target, guess } => write!(f, "Target: {target}, AI: {guess}"),
        }
    }
}

/// Round result from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Lose,
            Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn higher_wins<T: Ord>(player: T, opponent: T) -> Self {
        Self::from_ordering(player.cmp(&opponent))
    }

    pub fn lower_wins<T: Ord>(player: T, opponent: T) -> Self {
        Self::from_ordering(opponent.cmp(&player))
    }

    pub fn win_if(won: bool) -> Self {
        if won { Outcome::Win } else { Outcome::Lose }
    }
}
