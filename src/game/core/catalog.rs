use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// The six micro-games offered in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    RockPaperScissors,
    Dice,
    CoinFlip,
    QuickDraw,
    OddEven,
    NumberGuess,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::RockPaperScissors,
        GameKind::Dice,
        GameKind::CoinFlip,
        GameKind::QuickDraw,
        GameKind::OddEven,
        GameKind::NumberGuess,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GameKind::RockPaperScissors => "rock-paper-scissors",
            GameKind::Dice => "dice",
            GameKind::CoinFlip => "coin-flip",
            GameKind::QuickDraw => "quick-draw",
            GameKind::OddEven => "odd-even",
            GameKind::NumberGuess => "number-guess",
        }
    }

    pub fn descriptor(self) -> &'static GameDescriptor {
        &GAMES[self as usize]
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Display metadata for one game. Never touched by gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDescriptor {
    pub kind: GameKind,
    pub name: Cow<'static, str>,
    pub icon: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub spectators: u32,
    pub active_players: u32,
}

const fn descriptor(
    kind: GameKind,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    spectators: u32,
    active_players: u32,
) -> GameDescriptor {
    GameDescriptor {
        kind,
        name: Cow::Borrowed(name),
        icon: Cow::Borrowed(icon),
        description: Cow::Borrowed(description),
        spectators,
        active_players,
    }
}

/// Ordered the same as `GameKind::ALL`
pub static GAMES: [GameDescriptor; 6] = [
    descriptor(GameKind::RockPaperScissors, "Rock Paper Scissors", "✊", "Classic showdown", 234, 48),
    descriptor(GameKind::Dice, "Dice Roll", "🎲", "High roll wins", 189, 36),
    descriptor(GameKind::CoinFlip, "Coin Flip", "🪙", "Call it in the air", 312, 72),
    descriptor(GameKind::QuickDraw, "Quick Draw", "⚡", "Fastest click wins", 156, 28),
    descriptor(GameKind::OddEven, "Odd / Even", "🔢", "Pick your parity", 98, 22),
    descriptor(GameKind::NumberGuess, "Number Guess", "🎯", "Closest to target", 145, 31),
];

/// Cosmetic wager currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    #[default]
    Eth,
    Sol,
    Usdc,
    Ape,
    Pepe,
}

impl Token {
    pub const ALL: [Token; 5] = [Token::Eth, Token::Sol, Token::Usdc, Token::Ape, Token::Pepe];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Eth => "ETH",
            Token::Sol => "SOL",
            Token::Usdc => "USDC",
            Token::Ape => "APE",
            Token::Pepe => "PEPE",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Preset amounts offered next to the wager input
pub const QUICK_AMOUNTS: [&str; 4] = ["0.01", "0.1", "0.5", "1.0"];

/// Everything the presentation layer needs to draw the lobby and wager screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub games: Vec<GameDescriptor>,
    pub tokens: Vec<Token>,
    pub quick_amounts: Vec<Cow<'static, str>>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self {
            games: GAMES.to_vec(),
            tokens: Token::ALL.to_vec(),
            quick_amounts: QUICK_AMOUNTS.iter().map(|amount| Cow::Borrowed(*amount)).collect(),
        }
    }
}
