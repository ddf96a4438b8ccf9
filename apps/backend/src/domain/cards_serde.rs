//! Serialization and deserialization for cards.
//!
//! Cards travel as `{"color","type","number","isWild","isAction"}` objects.
//! `isWild`/`isAction` are always derived on output and ignored on input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, CardKind, Color};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireColor {
    Red,
    Blue,
    Green,
    Yellow,
    Wild,
}

impl From<Option<Color>> for WireColor {
    fn from(c: Option<Color>) -> Self {
        match c {
            Some(Color::Red) => WireColor::Red,
            Some(Color::Blue) => WireColor::Blue,
            Some(Color::Green) => WireColor::Green,
            Some(Color::Yellow) => WireColor::Yellow,
            None => WireColor::Wild,
        }
    }
}

impl WireColor {
    fn playable(self) -> Option<Color> {
        match self {
            WireColor::Red => Some(Color::Red),
            WireColor::Blue => Some(Color::Blue),
            WireColor::Green => Some(Color::Green),
            WireColor::Yellow => Some(Color::Yellow),
            WireColor::Wild => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardOut {
    color: WireColor,
    #[serde(rename = "type")]
    kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<u8>,
    is_wild: bool,
    is_action: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardIn {
    color: WireColor,
    #[serde(rename = "type")]
    kind: CardKind,
    #[serde(default)]
    number: Option<u8>,
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        CardOut {
            color: self.color().into(),
            kind: self.kind(),
            number: self.face_value(),
            is_wild: self.is_wild(),
            is_action: self.is_action(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = CardIn::deserialize(deserializer)?;
        let color = raw.color.playable();

        let card = match (raw.kind, color) {
            (CardKind::Wild, None) => Card::Wild,
            (CardKind::WildDrawFour, None) => Card::WildDrawFour,
            (CardKind::Wild | CardKind::WildDrawFour, Some(c)) => {
                return Err(serde::de::Error::custom(format!(
                    "Wild cards must have color \"wild\", got \"{c}\""
                )))
            }
            (_, None) => {
                return Err(serde::de::Error::custom(
                    "Only wild cards may have color \"wild\"",
                ))
            }
            (CardKind::Number, Some(c)) => {
                let n = raw
                    .number
                    .ok_or_else(|| serde::de::Error::custom("Number card requires a number"))?;
                Card::number(c, n).ok_or_else(|| {
                    serde::de::Error::custom(format!("Card number out of range: {n}"))
                })?
            }
            (CardKind::Skip, Some(c)) => Card::Skip(c),
            (CardKind::Reverse, Some(c)) => Card::Reverse(c),
            (CardKind::DrawTwo, Some(c)) => Card::DrawTwo(c),
        };

        if raw.number.is_some() && raw.kind != CardKind::Number {
            return Err(serde::de::Error::custom(format!(
                "Only number cards carry a number (got {:?})",
                raw.kind
            )));
        }

        Ok(card)
    }
}
