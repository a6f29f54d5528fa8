//! Card registry and solution triples
//!
//! A [`CardDeck`] is built once per game and shared as `Arc<CardDeck>` by every
//! agent at the table. Cards never change after registration; all other state
//! refers to them through [`CardId`] handles.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    identifiers::CardId,
};

/// Suspects of the classic game, followed by extras used for larger decks.
pub const SUSPECT_NAMES: [&str; 10] = [
    "Miss Scarlet",
    "Professor Plum",
    "Mrs. Peacock",
    "Mr. Green",
    "Colonel Mustard",
    "Mrs. White",
    "Dr. Orchid",
    "Monsieur Brunette",
    "Madame Rose",
    "Sergeant Gray",
];

/// Weapons of the classic game, followed by extras used for larger decks.
pub const WEAPON_NAMES: [&str; 10] = [
    "Knife",
    "Candlestick",
    "Revolver",
    "Rope",
    "Lead Pipe",
    "Wrench",
    "Poison",
    "Horseshoe",
    "Axe",
    "Dumbbell",
];

/// The nine rooms of the classic board.
pub const ROOM_NAMES: [&str; 9] = [
    "Kitchen",
    "Ballroom",
    "Conservatory",
    "Dining Room",
    "Billiard Room",
    "Library",
    "Lounge",
    "Hall",
    "Study",
];

/// Card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Suspect,
    Weapon,
    Room,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Suspect, Category::Weapon, Category::Room];

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Suspect => 0,
            Category::Weapon => 1,
            Category::Room => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Suspect => "suspect",
            Category::Weapon => "weapon",
            Category::Room => "room",
        };
        f.write_str(label)
    }
}

/// A single card: its category plus its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    category: Category,
    name: String,
}

impl Card {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Registry of every card in play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDeck {
    cards: Vec<Card>,
    by_category: [Vec<CardId>; 3],
}

impl CardDeck {
    /// Build a deck from the names of each category.
    ///
    /// # Errors
    ///
    /// Fails on an empty category or on a name registered twice within the
    /// same category.
    pub fn new<S, W, R>(suspects: S, weapons: W, rooms: R) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut deck = CardDeck {
            cards: Vec::new(),
            by_category: [Vec::new(), Vec::new(), Vec::new()],
        };
        for name in suspects {
            deck.register(Category::Suspect, name.into())?;
        }
        for name in weapons {
            deck.register(Category::Weapon, name.into())?;
        }
        for name in rooms {
            deck.register(Category::Room, name.into())?;
        }
        for category in Category::ALL {
            if deck.by_category[category.index()].is_empty() {
                return Err(Error::EmptyCategory { category });
            }
        }
        Ok(deck)
    }

    /// The classic deck: 6 suspects, 6 weapons, 9 rooms.
    pub fn classic() -> Self {
        Self::with_counts(6, 6).expect("classic deck names are unique and non-empty")
    }

    /// Deck with the given number of suspects and weapons and the nine
    /// classic rooms.
    ///
    /// # Errors
    ///
    /// Counts must lie in `1..=10`.
    pub fn with_counts(suspects: usize, weapons: usize) -> Result<Self> {
        for (label, count, available) in [
            ("suspects", suspects, SUSPECT_NAMES.len()),
            ("weapons", weapons, WEAPON_NAMES.len()),
        ] {
            if count == 0 || count > available {
                return Err(Error::InvalidConfiguration {
                    message: format!("{label} must be between 1 and {available}, got {count}"),
                });
            }
        }
        Self::new(
            SUSPECT_NAMES.iter().take(suspects).copied(),
            WEAPON_NAMES.iter().take(weapons).copied(),
            ROOM_NAMES,
        )
    }

    /// Wrap the deck for sharing between agents.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn register(&mut self, category: Category, name: String) -> Result<()> {
        if self.lookup(category, &name).is_some() {
            return Err(Error::DuplicateCard { category, name });
        }
        let id = CardId::new(self.cards.len());
        self.cards.push(Card { category, name });
        self.by_category[category.index()].push(id);
        Ok(())
    }

    fn lookup(&self, category: Category, name: &str) -> Option<CardId> {
        self.by_category[category.index()]
            .iter()
            .copied()
            .find(|id| self.cards[id.index()].name == name)
    }

    /// Find a card by category and name.
    pub fn find(&self, category: Category, name: &str) -> Result<CardId> {
        self.lookup(category, name)
            .ok_or_else(|| Error::UnknownCardName {
                category,
                name: name.to_string(),
            })
    }

    /// Total number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: CardId) -> bool {
        id.index() < self.cards.len()
    }

    /// Check that `id` belongs to this deck.
    pub fn validate(&self, id: CardId) -> Result<CardId> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(Error::UnknownCard {
                id: id.index(),
                deck_size: self.cards.len(),
            })
        }
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.validate(id).map(|id| &self.cards[id.index()])
    }

    /// Name of a card, or `"?"` for an id from another deck.
    pub fn name(&self, id: CardId) -> &str {
        self.cards.get(id.index()).map_or("?", |card| card.name.as_str())
    }

    /// Category of a card. Ids are only minted by decks, so an id from a
    /// larger deck is the only way to hit the fallback.
    pub fn category(&self, id: CardId) -> Category {
        self.cards
            .get(id.index())
            .map_or(Category::Room, |card| card.category)
    }

    /// All ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(CardId::new)
    }

    /// Ids of one category, in registration order.
    pub fn ids_in(&self, category: Category) -> &[CardId] {
        &self.by_category[category.index()]
    }

    /// Every (suspect, weapon, room) combination, suspect-major.
    pub fn all_solutions(&self) -> Vec<Triple> {
        let mut triples = Vec::with_capacity(
            self.by_category.iter().map(Vec::len).product::<usize>(),
        );
        for &suspect in self.ids_in(Category::Suspect) {
            for &weapon in self.ids_in(Category::Weapon) {
                for &room in self.ids_in(Category::Room) {
                    triples.push(Triple {
                        suspect,
                        weapon,
                        room,
                    });
                }
            }
        }
        triples
    }

    /// Build a triple from card names.
    pub fn triple(&self, suspect: &str, weapon: &str, room: &str) -> Result<Triple> {
        Ok(Triple {
            suspect: self.find(Category::Suspect, suspect)?,
            weapon: self.find(Category::Weapon, weapon)?,
            room: self.find(Category::Room, room)?,
        })
    }

    /// Human-readable rendering of a triple.
    pub fn describe(&self, triple: &Triple) -> String {
        format!(
            "({}, {}, {})",
            self.name(triple.suspect),
            self.name(triple.weapon),
            self.name(triple.room)
        )
    }
}

/// A (suspect, weapon, room) combination: a suggestion, an accusation or a
/// candidate solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    suspect: CardId,
    weapon: CardId,
    room: CardId,
}

impl Triple {
    /// Build a triple, checking each card's category against the deck.
    pub fn new(deck: &CardDeck, suspect: CardId, weapon: CardId, room: CardId) -> Result<Self> {
        for (id, expected) in [
            (suspect, Category::Suspect),
            (weapon, Category::Weapon),
            (room, Category::Room),
        ] {
            let card = deck.card(id)?;
            if card.category != expected {
                return Err(Error::CategoryMismatch {
                    name: card.name.clone(),
                    expected,
                    actual: card.category,
                });
            }
        }
        Ok(Self {
            suspect,
            weapon,
            room,
        })
    }

    pub fn suspect(&self) -> CardId {
        self.suspect
    }

    pub fn weapon(&self) -> CardId {
        self.weapon
    }

    pub fn room(&self) -> CardId {
        self.room
    }

    /// The three cards in suspect, weapon, room order.
    pub fn cards(&self) -> [CardId; 3] {
        [self.suspect, self.weapon, self.room]
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.suspect == card || self.weapon == card || self.room == card
    }

    /// The member of the given category.
    pub fn member(&self, category: Category) -> CardId {
        match category {
            Category::Suspect => self.suspect,
            Category::Weapon => self.weapon,
            Category::Room => self.room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_deck_has_expected_shape() {
        let deck = CardDeck::classic();
        assert_eq!(deck.len(), 21);
        assert_eq!(deck.ids_in(Category::Suspect).len(), 6);
        assert_eq!(deck.ids_in(Category::Weapon).len(), 6);
        assert_eq!(deck.ids_in(Category::Room).len(), 9);
        assert_eq!(deck.all_solutions().len(), 6 * 6 * 9);
    }

    #[test]
    fn lookups_are_structural() {
        let deck = CardDeck::classic();
        let knife = deck.find(Category::Weapon, "Knife").unwrap();
        assert_eq!(deck.find(Category::Weapon, "Knife").unwrap(), knife);
        assert_eq!(deck.category(knife), Category::Weapon);
        assert!(deck.find(Category::Suspect, "Knife").is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = CardDeck::new(["A", "A"], ["W"], ["R"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateCard { .. }));
    }

    #[test]
    fn empty_category_is_rejected() {
        let err = CardDeck::new(["A"], Vec::<String>::new(), ["R"]).unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyCategory {
                category: Category::Weapon
            }
        ));
    }

    #[test]
    fn triple_checks_categories() {
        let deck = CardDeck::classic();
        let plum = deck.find(Category::Suspect, "Professor Plum").unwrap();
        let rope = deck.find(Category::Weapon, "Rope").unwrap();
        let library = deck.find(Category::Room, "Library").unwrap();

        let triple = Triple::new(&deck, plum, rope, library).unwrap();
        assert_eq!(triple.cards(), [plum, rope, library]);
        assert_eq!(triple.member(Category::Weapon), rope);
        assert!(Triple::new(&deck, rope, plum, library).is_err());
    }

    #[test]
    fn with_counts_extends_names() {
        let deck = CardDeck::with_counts(8, 10).unwrap();
        assert_eq!(deck.ids_in(Category::Suspect).len(), 8);
        assert!(deck.find(Category::Weapon, "Dumbbell").is_ok());
        assert!(CardDeck::with_counts(11, 6).is_err());
    }
}
