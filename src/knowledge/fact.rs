//! Atomic facts fed through the agenda

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    cards::{CardDeck, Triple},
    identifiers::{CardId, PlayerId},
};

/// A single piece of evidence. Facts compare by value, which is what the
/// agenda uses to skip re-derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fact {
    /// The card is part of the hidden solution.
    InSolution(CardId),
    /// The player holds the card.
    HeldBy(CardId, PlayerId),
    /// The player does not hold the card.
    NotHeldBy(CardId, PlayerId),
    /// The player was asked about a suggestion containing the card and
    /// could not disprove it.
    CouldNotDisprove(CardId, PlayerId),
    /// The player disproved the suggestion with a card the observer did not see.
    Disproved(Triple, PlayerId),
    /// The observer's own suggestion went round the table undisproved.
    NotDisproved(Triple),
    /// Somebody accused this triple and was wrong.
    IncorrectAccusation(Triple),
    /// The card is not part of the hidden solution.
    NotInSolution(CardId),
}

impl Fact {
    /// Check every card and player the fact refers to.
    pub fn validate(&self, deck: &CardDeck, num_players: usize) -> Result<()> {
        let check_player = |player: PlayerId| {
            if player.index() < num_players {
                Ok(())
            } else {
                Err(Error::UnknownPlayer {
                    player: player.index(),
                    num_players,
                })
            }
        };
        let check_triple = |triple: &Triple| {
            Triple::new(deck, triple.suspect(), triple.weapon(), triple.room()).map(|_| ())
        };

        match self {
            Fact::InSolution(card) | Fact::NotInSolution(card) => deck.validate(*card).map(|_| ()),
            Fact::HeldBy(card, player)
            | Fact::NotHeldBy(card, player)
            | Fact::CouldNotDisprove(card, player) => {
                deck.validate(*card)?;
                check_player(*player)
            }
            Fact::Disproved(triple, player) => {
                check_triple(triple)?;
                check_player(*player)
            }
            Fact::NotDisproved(triple) | Fact::IncorrectAccusation(triple) => check_triple(triple),
        }
    }

    /// Render the fact with card names.
    pub fn describe(&self, deck: &CardDeck) -> String {
        match self {
            Fact::InSolution(card) => format!("{} is in the solution", deck.name(*card)),
            Fact::HeldBy(card, player) => format!("{player} holds {}", deck.name(*card)),
            Fact::NotHeldBy(card, player) => {
                format!("{player} does not hold {}", deck.name(*card))
            }
            Fact::CouldNotDisprove(card, player) => {
                format!("{player} could not disprove with {}", deck.name(*card))
            }
            Fact::Disproved(triple, player) => {
                format!("{player} disproved {}", deck.describe(triple))
            }
            Fact::NotDisproved(triple) => format!("nobody disproved {}", deck.describe(triple)),
            Fact::IncorrectAccusation(triple) => {
                format!("accusation {} was wrong", deck.describe(triple))
            }
            Fact::NotInSolution(card) => format!("{} is not in the solution", deck.name(*card)),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Category;

    #[test]
    fn facts_compare_by_value() {
        let deck = CardDeck::classic();
        let knife = deck.find(Category::Weapon, "Knife").unwrap();
        let same_knife = deck.find(Category::Weapon, "Knife").unwrap();
        assert_eq!(
            Fact::HeldBy(knife, PlayerId::new(1)),
            Fact::HeldBy(same_knife, PlayerId::new(1))
        );
        assert_ne!(
            Fact::HeldBy(knife, PlayerId::new(1)),
            Fact::NotHeldBy(knife, PlayerId::new(1))
        );
    }

    #[test]
    fn validation_rejects_unknown_players() {
        let deck = CardDeck::classic();
        let knife = deck.find(Category::Weapon, "Knife").unwrap();
        let err = Fact::HeldBy(knife, PlayerId::new(5))
            .validate(&deck, 3)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPlayer { player: 5, .. }));
    }

    #[test]
    fn validation_rejects_cards_from_a_larger_deck() {
        let small = CardDeck::new(["A"], ["B"], ["C"]).unwrap();
        let big = CardDeck::classic();
        let study = big.find(Category::Room, "Study").unwrap();
        assert!(Fact::InSolution(study).validate(&small, 3).is_err());
    }
}
