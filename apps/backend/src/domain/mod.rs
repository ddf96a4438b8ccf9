//! Domain layer: the pure game engine.
//!
//! Nothing here touches storage, clocks or HTTP. Time and randomness are
//! passed in by the caller.

pub mod accountant;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod events;
pub mod legality;
pub mod resolver;
pub mod room;
pub mod rules;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod turn_order;

#[cfg(test)]
mod tests_props_conservation;
#[cfg(test)]
mod tests_props_legality;

// Re-exports for ergonomics
pub use cards_types::{Card, CardKind, Color};
pub use dealing::{deal_hands, shuffle, shuffle_rng, standard_deck, ShuffleRng};
pub use events::{derive_transition_events, DeletionReason, GameEvent, GameEventKind};
pub use legality::{is_legal, legal_cards};
pub use resolver::resolve_play;
pub use room::{Departure, Player, Room, RoomStatus, RuleSettings};
pub use seed_derivation::derive_shuffle_seed;
pub use snapshot::{RoomDeleted, RoomSnapshot};
pub use state::{Direction, GameState, PendingDraw, PlayerId};
pub use turn_order::TurnOrder;
