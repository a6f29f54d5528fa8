//! Dealing the hidden solution and the players' hands.

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    cards::{CardDeck, Category, Triple},
    identifiers::{CardId, PlayerId},
};

/// The hidden solution and every seat's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    solution: Triple,
    hands: Vec<Vec<CardId>>,
}

impl Deal {
    /// Build a deal from explicit hands.
    ///
    /// Every card of `deck` must be either in the solution or in exactly one
    /// hand.
    pub fn new(deck: &CardDeck, solution: Triple, hands: Vec<Vec<CardId>>) -> Result<Self> {
        if hands.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "a deal needs at least one hand".to_string(),
            });
        }

        let mut seen = vec![0usize; deck.len()];
        for card in solution.cards().into_iter().chain(hands.iter().flatten().copied()) {
            deck.validate(card)?;
            seen[card.index()] += 1;
        }
        if let Some(index) = seen.iter().position(|&count| count != 1) {
            let card = deck.ids().nth(index).map(|id| deck.name(id)).unwrap_or("?");
            return Err(Error::InvalidConfiguration {
                message: format!("card {card} is dealt {} times", seen[index]),
            });
        }
        Ok(Self { solution, hands })
    }

    /// Draw a random solution and deal the rest round the table.
    ///
    /// Every seat gets the same number of cards; leftovers go one each to
    /// the first seats.
    pub fn random<R: Rng + ?Sized>(deck: &CardDeck, num_players: usize, rng: &mut R) -> Result<Self> {
        let mut pick = |category: Category| -> Result<CardId> {
            deck.ids_in(category)
                .choose(&mut *rng)
                .copied()
                .ok_or(Error::EmptyCategory { category })
        };
        let suspect = pick(Category::Suspect)?;
        let weapon = pick(Category::Weapon)?;
        let room = pick(Category::Room)?;
        let solution = Triple::new(deck, suspect, weapon, room)?;

        let mut remaining: Vec<CardId> = deck.ids().filter(|&c| !solution.contains(c)).collect();
        if num_players == 0 || remaining.len() < num_players {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "cannot deal {} cards to {num_players} players",
                    remaining.len()
                ),
            });
        }
        remaining.shuffle(rng);

        let per_seat = remaining.len() / num_players;
        let mut hands: Vec<Vec<CardId>> = remaining
            .chunks(per_seat)
            .take(num_players)
            .map(<[CardId]>::to_vec)
            .collect();

        for (hand, card) in hands.iter_mut().zip(&remaining[per_seat * num_players..]) {
            hand.push(*card);
        }

        Ok(Self { solution, hands })
    }

    pub fn solution(&self) -> Triple {
        self.solution
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn hands(&self) -> &[Vec<CardId>] {
        &self.hands
    }

    /// Hand dealt to `player`; empty for unknown seats.
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        self.hands.get(player.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Seat holding `card`, if it is not part of the solution.
    pub fn holder(&self, card: CardId) -> Option<PlayerId> {
        self.hands
            .iter()
            .position(|hand| hand.contains(&card))
            .map(PlayerId::new)
    }
}
