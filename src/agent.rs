//! Knowledge-based Cluedo agent
//!
//! [`KrAgent`] wraps one [`InferenceEngine`] per game and turns its knowledge
//! into game decisions: where to go, what to suggest, which card to show and
//! when to accuse. Evidence is only queued by the `record_*` methods; the
//! caller decides when to pay for [`KrAgent::run_inference`].

use std::sync::Arc;

use rand::{rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    cards::{CardDeck, Category, Triple},
    config::AgentConfig,
    identifiers::{CardId, PlayerId},
    knowledge::{
        InferenceEngine, InformationGain, Knowledge, KnowledgeBase, KnowledgeSummary,
        RankedSuggestion, SuggestionOutcome, fallback_suggestion, rank_suggestions,
    },
    utils::build_rng,
};

/// A player that reasons over what it has seen by forward chaining.
#[derive(Debug, Clone)]
pub struct KrAgent {
    seat: PlayerId,
    hand: Vec<CardId>,
    engine: InferenceEngine,
    past_suggestions: Vec<Triple>,
    rng: StdRng,
}

impl KrAgent {
    /// Create an agent sitting at `seat` with empty knowledge.
    ///
    /// # Errors
    ///
    /// Fails if `seat` is not a seat of a `num_players` table.
    pub fn new(
        seat: PlayerId,
        num_players: usize,
        deck: Arc<CardDeck>,
        config: AgentConfig,
    ) -> Result<Self> {
        check_seat(seat, num_players)?;
        Ok(Self {
            seat,
            hand: Vec::new(),
            engine: InferenceEngine::new(deck, num_players, seat)?,
            past_suggestions: Vec::new(),
            rng: build_rng(config.seed),
        })
    }

    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.engine.knowledge()
    }

    pub fn deck(&self) -> &Arc<CardDeck> {
        self.engine.deck()
    }

    /// Suggestions this agent has made since its knowledge was last reset.
    pub fn past_suggestions(&self) -> &[Triple] {
        &self.past_suggestions
    }

    /// Forget everything, keeping the seat and table size.
    pub fn reset_knowledge(&mut self) -> Result<()> {
        let num_players = self.engine.knowledge().num_players();
        self.engine = InferenceEngine::new(Arc::clone(self.deck()), num_players, self.seat)?;
        self.hand.clear();
        self.past_suggestions.clear();
        Ok(())
    }

    /// Start a new game holding `hand` at a table of `num_players`.
    ///
    /// Replaces any previous knowledge. The hand is queued as evidence and
    /// takes effect on the next [`run_inference`](Self::run_inference).
    pub fn init_knowledge(&mut self, hand: &[CardId], num_players: usize) -> Result<()> {
        check_seat(self.seat, num_players)?;
        let mut engine = InferenceEngine::new(Arc::clone(self.deck()), num_players, self.seat)?;
        engine.ingest_hand(hand)?;

        self.engine = engine;
        self.hand = hand.to_vec();
        self.past_suggestions.clear();
        tracing::debug!(seat = %self.seat, num_players, cards = hand.len(), "knowledge initialised");
        Ok(())
    }

    /// Queue the evidence of a suggestion outcome as this agent saw it.
    pub fn record_suggestion_outcome(&mut self, outcome: &SuggestionOutcome) -> Result<()> {
        self.engine.ingest_suggestion(outcome)?;
        Ok(())
    }

    /// Queue the evidence of an accusation outcome.
    pub fn record_accusation_outcome(&mut self, triple: Triple, correct: bool) -> Result<()> {
        self.engine.ingest_accusation(triple, correct)
    }

    /// Drain the agenda and report what was learned.
    pub fn run_inference(&mut self) -> Result<InformationGain> {
        self.engine.run()
    }

    pub fn candidate_solution_count(&self) -> usize {
        self.knowledge().candidate_count()
    }

    /// The solution, once exactly one candidate remains.
    pub fn known_solution(&self) -> Option<Triple> {
        self.knowledge().known_solution()
    }

    /// Suggestions in `room` ranked by simulated information gain.
    pub fn rank_suggestions(&self, room: CardId) -> Result<Vec<RankedSuggestion>> {
        rank_suggestions(&self.engine, room)
    }

    /// Pick the suggestion to make in `room` and remember it.
    ///
    /// Takes the best-ranked suggestion not made before, then the best-ranked
    /// one at all, and falls back to a random suggestion over open cards when
    /// no candidate solution uses this room.
    pub fn choose_suggestion(&mut self, room: CardId) -> Result<Triple> {
        let ranked = self.rank_suggestions(room)?;
        let fresh = ranked
            .iter()
            .find(|r| !self.past_suggestions.contains(&r.triple))
            .or(ranked.first())
            .map(|r| r.triple);

        let triple = match fresh {
            Some(triple) => triple,
            None => fallback_suggestion(&self.engine, room, &mut self.rng)?,
        };
        self.past_suggestions.push(triple);
        Ok(triple)
    }

    /// Pick the next room to move to.
    ///
    /// Prefers rooms whose solution status is open, then rooms that still
    /// appear in some candidate, then any room.
    pub fn choose_destination(&mut self) -> Result<CardId> {
        let kb = self.engine.knowledge();
        let rooms = self.engine.deck().ids_in(Category::Room);

        let mut pool = kb.unknown_in(Category::Room);
        if pool.is_empty() {
            pool = rooms
                .iter()
                .copied()
                .filter(|&room| kb.candidates().iter().any(|t| t.room() == room))
                .collect();
        }
        if pool.is_empty() {
            pool = rooms.to_vec();
        }
        pool.choose(&mut self.rng)
            .copied()
            .ok_or(Error::EmptyCategory {
                category: Category::Room,
            })
    }

    /// Card to show against someone else's suggestion, if any.
    pub fn respond_to_suggestion(&mut self, triple: &Triple) -> Option<CardId> {
        let matching: Vec<CardId> = triple
            .cards()
            .into_iter()
            .filter(|card| self.hand.contains(card))
            .collect();
        matching.choose(&mut self.rng).copied()
    }

    /// Accuse only when the solution is certain.
    pub fn make_accusation(&self) -> Option<Triple> {
        self.known_solution()
    }

    pub fn summary(&self) -> KnowledgeSummary {
        self.knowledge().summary()
    }

    /// Status of `card` as a solution member.
    pub fn solution_status(&self, card: CardId) -> Knowledge {
        self.knowledge().card_status(card)
    }
}

fn check_seat(seat: PlayerId, num_players: usize) -> Result<()> {
    if seat.index() >= num_players {
        return Err(Error::UnknownPlayer {
            player: seat.index(),
            num_players,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(seat: usize, players: usize) -> KrAgent {
        KrAgent::new(
            PlayerId::new(seat),
            players,
            CardDeck::classic().shared(),
            AgentConfig::new().with_seed(11),
        )
        .unwrap()
    }

    fn names(deck: &CardDeck, cards: &[(Category, &str)]) -> Vec<CardId> {
        cards
            .iter()
            .map(|&(category, name)| deck.find(category, name).unwrap())
            .collect()
    }

    #[test]
    fn seat_outside_the_table_is_rejected() {
        let deck = CardDeck::classic().shared();
        let err = KrAgent::new(PlayerId::new(3), 3, deck, AgentConfig::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownPlayer { player: 3, .. }));
    }

    #[test]
    fn hand_takes_effect_after_inference() {
        let mut agent = agent(0, 3);
        let deck = Arc::clone(agent.deck());
        let hand = names(&deck, &[(Category::Weapon, "Knife"), (Category::Room, "Hall")]);
        agent.init_knowledge(&hand, 3).unwrap();
        assert_eq!(agent.candidate_solution_count(), 324);

        agent.run_inference().unwrap();
        assert_eq!(agent.candidate_solution_count(), 6 * 5 * 8);
        assert_eq!(agent.solution_status(hand[0]), Knowledge::False);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut agent = agent(1, 3);
        let deck = Arc::clone(agent.deck());
        let hand = names(&deck, &[(Category::Suspect, "Mrs. White")]);
        agent.init_knowledge(&hand, 3).unwrap();
        agent.run_inference().unwrap();
        let hall = deck.find(Category::Room, "Hall").unwrap();
        agent.choose_suggestion(hall).unwrap();

        agent.reset_knowledge().unwrap();
        assert_eq!(agent.candidate_solution_count(), 324);
        assert!(agent.hand().is_empty());
        assert!(agent.past_suggestions().is_empty());
    }

    #[test]
    fn suggestions_are_not_repeated_while_alternatives_exist() {
        let mut agent = agent(0, 3);
        let deck = Arc::clone(agent.deck());
        agent.init_knowledge(&[], 3).unwrap();
        agent.run_inference().unwrap();
        let hall = deck.find(Category::Room, "Hall").unwrap();

        let first = agent.choose_suggestion(hall).unwrap();
        let second = agent.choose_suggestion(hall).unwrap();
        assert_ne!(first, second);
        assert_eq!(first.room(), hall);
        assert_eq!(agent.past_suggestions(), &[first, second]);
    }

    #[test]
    fn destinations_prefer_open_rooms() {
        let mut agent = agent(0, 3);
        let deck = Arc::clone(agent.deck());
        let rooms = deck.ids_in(Category::Room).to_vec();
        agent.init_knowledge(&rooms[1..], 3).unwrap();
        agent.run_inference().unwrap();

        // Only the first room is left, so it is the solution room.
        assert_eq!(agent.solution_status(rooms[0]), Knowledge::True);
        for _ in 0..10 {
            assert_eq!(agent.choose_destination().unwrap(), rooms[0]);
        }
    }

    #[test]
    fn responses_only_show_held_cards() {
        let mut agent = agent(2, 3);
        let deck = Arc::clone(agent.deck());
        let hand = names(&deck, &[(Category::Weapon, "Rope"), (Category::Room, "Hall")]);
        agent.init_knowledge(&hand, 3).unwrap();

        let held = deck.triple("Mr. Green", "Rope", "Hall").unwrap();
        for _ in 0..10 {
            let card = agent.respond_to_suggestion(&held).unwrap();
            assert!(hand.contains(&card));
        }
        let missed = deck.triple("Mr. Green", "Knife", "Study").unwrap();
        assert_eq!(agent.respond_to_suggestion(&missed), None);
    }

    #[test]
    fn accusation_waits_for_certainty() {
        let mut agent = agent(0, 3);
        let deck = Arc::clone(agent.deck());
        agent.init_knowledge(&[], 3).unwrap();
        assert_eq!(agent.make_accusation(), None);

        let solution = deck.triple("Colonel Mustard", "Candlestick", "Kitchen").unwrap();
        agent.record_accusation_outcome(solution, true).unwrap();
        // A correct accusation pins every member, which leaves one candidate.
        agent.run_inference().unwrap();
        assert_eq!(agent.make_accusation(), Some(solution));
    }
}
