use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four playable colors. Wild cards carry no color of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card face type without its color or number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    Number,
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

/// A single card. Numbers are always in `0..=9`; the deserializer and
/// [`Card::number`] refuse anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {
    Number(Color, u8),
    Skip(Color),
    Reverse(Color),
    DrawTwo(Color),
    Wild,
    WildDrawFour,
}

impl Card {
    /// Build a number card, rejecting values above 9.
    pub fn number(color: Color, value: u8) -> Option<Card> {
        (value <= 9).then_some(Card::Number(color, value))
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Number(..) => CardKind::Number,
            Card::Skip(_) => CardKind::Skip,
            Card::Reverse(_) => CardKind::Reverse,
            Card::DrawTwo(_) => CardKind::DrawTwo,
            Card::Wild => CardKind::Wild,
            Card::WildDrawFour => CardKind::WildDrawFour,
        }
    }

    /// Printed color; `None` for both wild cards.
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Number(c, _) | Card::Skip(c) | Card::Reverse(c) | Card::DrawTwo(c) => Some(*c),
            Card::Wild | Card::WildDrawFour => None,
        }
    }

    pub fn face_value(&self) -> Option<u8> {
        match self {
            Card::Number(_, n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDrawFour)
    }

    /// Everything except plain number cards.
    pub fn is_action(&self) -> bool {
        !matches!(self, Card::Number(..))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number(c, n) => write!(f, "{c} {n}"),
            Card::Skip(c) => write!(f, "{c} skip"),
            Card::Reverse(c) => write!(f, "{c} reverse"),
            Card::DrawTwo(c) => write!(f, "{c} draw two"),
            Card::Wild => f.write_str("wild"),
            Card::WildDrawFour => f.write_str("wild draw four"),
        }
    }
}
