//! Suggestion advisor
//!
//! Ranks the suggestions available in a room by how much a plausible answer
//! would teach us. Each candidate is scored on a clone of the live engine:
//! the first opponent in turn order who could hold one of the three cards is
//! assumed to show it, everyone asked before them is assumed to have passed,
//! and the clone's inference pass reports the gain. The live engine is only
//! ever read.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    base::Knowledge,
    engine::{InferenceEngine, InformationGain},
    fact::Fact,
};
use crate::{
    Error, Result,
    cards::{Category, Triple},
    identifiers::CardId,
};

/// A suggestion together with its simulated information gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSuggestion {
    pub triple: Triple,
    pub score: InformationGain,
}

/// Rank every remaining candidate in `room` as a suggestion, best first.
///
/// Candidates are enumerated in [`Triple`] order and the sort is stable, so
/// equal scores keep that order.
///
/// # Errors
///
/// Fails if `room` is not a room card of the engine's deck.
pub fn rank_suggestions(engine: &InferenceEngine, room: CardId) -> Result<Vec<RankedSuggestion>> {
    check_room(engine, room)?;

    let mut ranked: Vec<RankedSuggestion> = engine
        .knowledge()
        .candidates()
        .iter()
        .filter(|triple| triple.room() == room)
        .map(|&triple| RankedSuggestion {
            triple,
            score: evaluate_suggestion(engine, triple),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    if let Some(best) = ranked.first() {
        tracing::debug!(
            room = engine.deck().name(room),
            options = ranked.len(),
            best = %engine.deck().describe(&best.triple),
            score = %best.score,
            "ranked suggestions"
        );
    }
    Ok(ranked)
}

/// Simulated information gain of making `triple` as a suggestion.
pub fn evaluate_suggestion(engine: &InferenceEngine, triple: Triple) -> InformationGain {
    let mut hypothetical = engine.clone();
    for fact in simulated_response(engine, triple) {
        hypothetical.queue(fact);
    }
    match hypothetical.run() {
        Ok(gain) => gain,
        Err(err) => {
            tracing::debug!(
                suggestion = %engine.deck().describe(&triple),
                error = %err,
                "hypothetical response is inconsistent"
            );
            InformationGain::NONE
        }
    }
}

/// Facts describing the most plausible response to our suggestion.
fn simulated_response(engine: &InferenceEngine, triple: Triple) -> Vec<Fact> {
    let kb = engine.knowledge();
    let owner = engine.owner();
    let num_players = kb.num_players();
    let mut passed = Vec::new();

    let mut seat = owner.next(num_players);
    while seat != owner {
        let shown = triple
            .cards()
            .into_iter()
            .find(|&card| kb.hand_status(seat, card) != Knowledge::False);
        if let Some(card) = shown {
            let mut facts = vec![Fact::HeldBy(card, seat)];
            facts.extend(passed);
            return facts;
        }
        passed.extend(
            triple
                .cards()
                .into_iter()
                .map(|card| Fact::CouldNotDisprove(card, seat)),
        );
        seat = seat.next(num_players);
    }

    let mut facts = vec![Fact::NotDisproved(triple)];
    facts.extend(passed);
    facts
}

/// Random suggestion in `room` from the suspects and weapons whose status is
/// still open, falling back to any suspect or weapon once a category is
/// settled.
pub fn fallback_suggestion<R: Rng + ?Sized>(
    engine: &InferenceEngine,
    room: CardId,
    rng: &mut R,
) -> Result<Triple> {
    check_room(engine, room)?;
    let kb = engine.knowledge();
    let deck = engine.deck();

    let mut pick = |category: Category| -> Result<CardId> {
        let unknown = kb.unknown_in(category);
        let pool: &[CardId] = if unknown.is_empty() {
            deck.ids_in(category)
        } else {
            &unknown
        };
        pool.choose(&mut *rng)
            .copied()
            .ok_or(Error::EmptyCategory { category })
    };

    let suspect = pick(Category::Suspect)?;
    let weapon = pick(Category::Weapon)?;
    Triple::new(deck, suspect, weapon, room)
}

fn check_room(engine: &InferenceEngine, room: CardId) -> Result<()> {
    let card = engine.deck().card(room)?;
    if card.category() != Category::Room {
        return Err(Error::CategoryMismatch {
            name: card.name().to_string(),
            expected: Category::Room,
            actual: card.category(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{cards::CardDeck, identifiers::PlayerId};

    fn engine() -> InferenceEngine {
        InferenceEngine::new(CardDeck::classic().shared(), 3, PlayerId::new(0)).unwrap()
    }

    #[test]
    fn ranking_leaves_live_knowledge_untouched() {
        let mut engine = engine();
        let deck = std::sync::Arc::clone(engine.deck());
        let hand = vec![
            deck.find(Category::Suspect, "Mrs. White").unwrap(),
            deck.find(Category::Weapon, "Knife").unwrap(),
        ];
        engine.ingest_hand(&hand).unwrap();
        engine.run().unwrap();

        let before = engine.knowledge().candidate_count();
        let processed = engine.agenda().processed_count();
        let hall = deck.find(Category::Room, "Hall").unwrap();

        let ranked = rank_suggestions(&engine, hall).unwrap();

        assert_eq!(ranked.len(), 5 * 5);
        assert!(ranked.iter().all(|r| r.triple.room() == hall));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(engine.knowledge().candidate_count(), before);
        assert_eq!(engine.agenda().processed_count(), processed);
    }

    #[test]
    fn response_goes_to_first_plausible_holder() {
        let mut engine = engine();
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        for card in triple.cards() {
            engine
                .assert_fact(Fact::CouldNotDisprove(card, PlayerId::new(1)))
                .unwrap();
        }
        engine.run().unwrap();

        let response = simulated_response(&engine, triple);
        assert_eq!(response[0], Fact::HeldBy(triple.suspect(), PlayerId::new(2)));
        assert_eq!(response.len(), 4);
        assert!(
            response[1..]
                .iter()
                .all(|fact| matches!(fact, Fact::CouldNotDisprove(_, p) if *p == PlayerId::new(1)))
        );
    }

    #[test]
    fn unanswerable_suggestion_scores_decisive() {
        let mut engine = engine();
        let deck = std::sync::Arc::clone(engine.deck());
        let triple = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        for player in [PlayerId::new(1), PlayerId::new(2)] {
            for card in triple.cards() {
                engine.assert_fact(Fact::CouldNotDisprove(card, player)).unwrap();
            }
        }
        engine.run().unwrap();

        assert_eq!(evaluate_suggestion(&engine, triple), InformationGain::Decisive);
    }

    #[test]
    fn ranking_rejects_non_rooms() {
        let engine = engine();
        let knife = engine.deck().find(Category::Weapon, "Knife").unwrap();
        assert!(matches!(
            rank_suggestions(&engine, knife),
            Err(Error::CategoryMismatch { .. })
        ));
    }

    #[test]
    fn fallback_prefers_open_cards() {
        let mut engine = engine();
        let deck = std::sync::Arc::clone(engine.deck());
        let weapons = deck.ids_in(Category::Weapon).to_vec();
        for &card in &weapons[2..] {
            engine.assert_fact(Fact::HeldBy(card, PlayerId::new(1))).unwrap();
        }
        engine.run().unwrap();

        let study = deck.find(Category::Room, "Study").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let triple = fallback_suggestion(&engine, study, &mut rng).unwrap();
            assert_eq!(triple.room(), study);
            assert!(weapons[..2].contains(&triple.weapon()));
        }
    }
}
