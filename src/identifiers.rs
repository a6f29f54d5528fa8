//! Domain identifier types for cards and seats.
//!
//! Both are small `Copy` handles. Cards are owned once by a
//! [`CardDeck`](crate::cards::CardDeck); everything else refers to them through
//! a [`CardId`], so two handles compare equal exactly when they name the same
//! (category, name) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a card in a [`CardDeck`](crate::cards::CardDeck).
///
/// Ids are minted by the deck in registration order (suspects, then weapons,
/// then rooms), which also fixes the ordering used for deterministic
/// enumeration of candidate solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u16);

impl CardId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u16::MAX as usize);
        Self(index as u16)
    }

    /// Position of the card inside its deck.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Seat index of a player, in turn order starting from 0.
///
/// # Examples
///
/// ```
/// use cluedo::identifiers::PlayerId;
///
/// let player = PlayerId::new(2);
/// assert_eq!(player.index(), 2);
/// assert_eq!(player.to_string(), "Player 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(usize);

impl PlayerId {
    /// Create a seat handle.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based seat index.
    pub fn index(self) -> usize {
        self.0
    }

    /// The seat after this one, wrapping around a table of `num_players`.
    pub fn next(self, num_players: usize) -> Self {
        Self((self.0 + 1) % num_players)
    }

    /// Every seat of a table of `num_players`, in turn order.
    pub fn all(num_players: usize) -> impl Iterator<Item = PlayerId> {
        (0..num_players).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

impl From<usize> for PlayerId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn next_wraps_around_the_table() {
        assert_eq!(PlayerId::new(0).next(3), PlayerId::new(1));
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
    }

    #[test]
    fn all_lists_seats_in_turn_order() {
        let seats: Vec<usize> = PlayerId::all(4).map(PlayerId::index).collect();
        assert_eq!(seats, vec![0, 1, 2, 3]);
    }
}
