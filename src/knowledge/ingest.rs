//! Evidence ingestion: observed game events become seed facts.
//!
//! Nothing here runs inference. Callers queue evidence and then call
//! [`InferenceEngine::run`].

use serde::{Deserialize, Serialize};

use super::{engine::InferenceEngine, fact::Fact};
use crate::{
    Error, Result,
    cards::Triple,
    identifiers::{CardId, PlayerId},
};

/// Public outcome of a suggestion, as seen by one observer.
///
/// `shown` is only `Some` when the observer was allowed to see the card: it
/// made the suggestion or it was the one showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOutcome {
    pub triple: Triple,
    pub suggester: PlayerId,
    pub responder: Option<PlayerId>,
    pub shown: Option<CardId>,
}

impl SuggestionOutcome {
    /// Outcome with the shown card hidden.
    pub fn redacted(&self) -> Self {
        Self {
            shown: None,
            ..*self
        }
    }

    /// The players asked before the responder, in turn order. When nobody
    /// disproved, every other player was asked.
    pub fn skipped_players(&self, num_players: usize) -> Vec<PlayerId> {
        let mut skipped = Vec::new();
        let mut seat = self.suggester.next(num_players);
        while seat != self.suggester && Some(seat) != self.responder {
            skipped.push(seat);
            seat = seat.next(num_players);
        }
        skipped
    }
}

/// Outcome of an accusation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationOutcome {
    pub triple: Triple,
    pub accuser: PlayerId,
    pub correct: bool,
}

impl InferenceEngine {
    /// Seed the owner's own hand: held cards and, for every other card, the
    /// fact that the owner lacks it.
    pub fn ingest_hand(&mut self, hand: &[CardId]) -> Result<()> {
        let deck = std::sync::Arc::clone(self.deck());
        for &card in hand {
            deck.validate(card)?;
        }
        let owner = self.owner();
        for card in deck.ids() {
            if hand.contains(&card) {
                self.queue(Fact::HeldBy(card, owner));
            } else {
                self.queue(Fact::NotHeldBy(card, owner));
            }
        }
        tracing::debug!(%owner, cards = hand.len(), "seeded own hand");
        Ok(())
    }

    /// Queue the facts implied by a suggestion's public outcome. Returns the
    /// number of facts queued.
    ///
    /// # Errors
    ///
    /// Rejects unknown players or cards, a suggester disproving their own
    /// suggestion, a shown card outside the suggestion, and a disproof of
    /// the owner's own suggestion with no card shown.
    pub fn ingest_suggestion(&mut self, outcome: &SuggestionOutcome) -> Result<usize> {
        self.validate_suggestion(outcome)?;

        let owner = self.owner();
        let triple = outcome.triple;
        let mut facts = Vec::new();

        match (outcome.responder, outcome.shown) {
            (None, _) => {
                if outcome.suggester == owner {
                    facts.push(Fact::NotDisproved(triple));
                }
            }
            (Some(responder), Some(card)) => {
                if responder != owner {
                    facts.push(Fact::HeldBy(card, responder));
                }
            }
            (Some(responder), None) => {
                if outcome.suggester == owner {
                    return Err(Error::MissingShownCard {
                        responder: responder.index(),
                    });
                }
                if responder != owner {
                    facts.push(Fact::Disproved(triple, responder));
                }
            }
        }

        for skipped in outcome.skipped_players(self.knowledge().num_players()) {
            facts.extend(
                triple
                    .cards()
                    .into_iter()
                    .map(|card| Fact::CouldNotDisprove(card, skipped)),
            );
        }

        tracing::debug!(
            owner = %owner,
            suggester = %outcome.suggester,
            responder = ?outcome.responder.map(PlayerId::index),
            queued = facts.len(),
            "ingested suggestion"
        );
        let queued = facts.len();
        for fact in facts {
            self.queue(fact);
        }
        Ok(queued)
    }

    /// Queue the facts implied by an accusation's outcome.
    pub fn ingest_accusation(&mut self, triple: Triple, correct: bool) -> Result<()> {
        let fact = Fact::IncorrectAccusation(triple);
        fact.validate(self.deck(), self.knowledge().num_players())?;
        if correct {
            for card in triple.cards() {
                self.queue(Fact::InSolution(card));
            }
        } else {
            self.queue(fact);
        }
        Ok(())
    }

    fn validate_suggestion(&self, outcome: &SuggestionOutcome) -> Result<()> {
        let num_players = self.knowledge().num_players();
        Fact::Disproved(outcome.triple, outcome.suggester).validate(self.deck(), num_players)?;

        if let Some(responder) = outcome.responder {
            if responder.index() >= num_players {
                return Err(Error::UnknownPlayer {
                    player: responder.index(),
                    num_players,
                });
            }
            if responder == outcome.suggester {
                return Err(Error::SelfDisproof {
                    player: responder.index(),
                });
            }
        }
        if let Some(card) = outcome.shown
            && !outcome.triple.contains(card)
        {
            return Err(Error::ShownCardNotSuggested {
                card: self.deck().name(card).to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cards::{CardDeck, Category},
        knowledge::Knowledge,
    };

    fn engine(owner: usize, players: usize) -> InferenceEngine {
        InferenceEngine::new(CardDeck::classic().shared(), players, PlayerId::new(owner)).unwrap()
    }

    #[test]
    fn skipped_players_wrap_around_the_table() {
        let deck = CardDeck::classic();
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        let outcome = SuggestionOutcome {
            triple,
            suggester: PlayerId::new(2),
            responder: Some(PlayerId::new(1)),
            shown: None,
        };
        assert_eq!(
            outcome.skipped_players(4),
            vec![PlayerId::new(3), PlayerId::new(0)]
        );

        let nobody = SuggestionOutcome {
            responder: None,
            ..outcome
        };
        assert_eq!(
            nobody.skipped_players(4),
            vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(1)]
        );
    }

    #[test]
    fn own_hand_seeds_held_and_lacked_cards() {
        let mut engine = engine(0, 3);
        let deck = std::sync::Arc::clone(engine.deck());
        let hand = vec![
            deck.find(Category::Weapon, "Knife").unwrap(),
            deck.find(Category::Room, "Hall").unwrap(),
        ];
        engine.ingest_hand(&hand).unwrap();
        engine.run().unwrap();

        let kb = engine.knowledge();
        let me = PlayerId::new(0);
        for card in deck.ids() {
            let expected = if hand.contains(&card) {
                Knowledge::True
            } else {
                Knowledge::False
            };
            assert_eq!(kb.hand_status(me, card), expected);
        }
        assert_eq!(kb.candidate_count(), 6 * 5 * 8);
    }

    #[test]
    fn hidden_disproof_by_third_party() {
        let mut engine = engine(0, 4);
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        let outcome = SuggestionOutcome {
            triple,
            suggester: PlayerId::new(1),
            responder: Some(PlayerId::new(3)),
            shown: None,
        };
        assert_eq!(engine.ingest_suggestion(&outcome).unwrap(), 4);
        engine.run().unwrap();

        let kb = engine.knowledge();
        assert_eq!(kb.possible_disproofs(PlayerId::new(3)).len(), 1);
        for card in triple.cards() {
            assert_eq!(kb.hand_status(PlayerId::new(2), card), Knowledge::False);
        }
        assert!(!kb.candidates().contains(&triple));
    }

    #[test]
    fn own_suggestion_disproved_reveals_the_card() {
        let mut engine = engine(0, 3);
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        let outcome = SuggestionOutcome {
            triple,
            suggester: PlayerId::new(0),
            responder: Some(PlayerId::new(2)),
            shown: Some(triple.weapon()),
        };
        engine.ingest_suggestion(&outcome).unwrap();
        engine.run().unwrap();

        let kb = engine.knowledge();
        assert_eq!(kb.hand_status(PlayerId::new(2), triple.weapon()), Knowledge::True);
        assert_eq!(kb.hand_status(PlayerId::new(1), triple.suspect()), Knowledge::False);
        assert_eq!(kb.card_status(triple.weapon()), Knowledge::False);
    }

    #[test]
    fn invalid_outcomes_are_rejected() {
        let mut engine = engine(0, 3);
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        let knife = deck.find(Category::Weapon, "Knife").unwrap();

        let self_disproof = SuggestionOutcome {
            triple,
            suggester: PlayerId::new(1),
            responder: Some(PlayerId::new(1)),
            shown: None,
        };
        assert!(matches!(
            engine.ingest_suggestion(&self_disproof),
            Err(Error::SelfDisproof { player: 1 })
        ));

        let wrong_card = SuggestionOutcome {
            responder: Some(PlayerId::new(2)),
            shown: Some(knife),
            ..self_disproof
        };
        assert!(matches!(
            engine.ingest_suggestion(&wrong_card),
            Err(Error::ShownCardNotSuggested { .. })
        ));

        let unseen = SuggestionOutcome {
            suggester: PlayerId::new(0),
            responder: Some(PlayerId::new(2)),
            shown: None,
            triple,
        };
        assert!(matches!(
            engine.ingest_suggestion(&unseen),
            Err(Error::MissingShownCard { responder: 2 })
        ));
        assert!(engine.agenda().is_empty());
    }

    #[test]
    fn accusations_feed_the_agenda() {
        let mut engine = engine(0, 3);
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();

        engine.ingest_accusation(triple, false).unwrap();
        engine.run().unwrap();
        assert!(!engine.knowledge().candidates().contains(&triple));

        engine.ingest_accusation(triple, true).unwrap();
        let err = engine.run().unwrap_err();
        assert!(matches!(err, Error::CandidatesExhausted { .. }));
    }
}
