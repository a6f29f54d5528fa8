//! A single match between knowledge-based agents.
//!
//! Board movement is abstracted away: on its turn an agent picks any room and
//! is there. Suggestions are answered clockwise from the suggester. The first
//! player holding a suggested card shows one, and only the suggester and the
//! responder learn which. Players eliminated by a wrong accusation stop
//! taking turns but still answer suggestions.

use std::sync::Arc;

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::deal::Deal;
use crate::{
    Error, Result,
    agent::KrAgent,
    cards::{CardDeck, Triple},
    config::{AgentConfig, GameConfig},
    identifiers::PlayerId,
    knowledge::{AccusationOutcome, SuggestionOutcome},
};

/// Something that happened during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Suggestion(SuggestionOutcome),
    Accusation(AccusationOutcome),
}

/// Summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Winning seat, `None` for a stalemate
    pub winner: Option<PlayerId>,
    /// Turns played
    pub turns: usize,
    /// The hidden solution
    pub solution: Triple,
    /// Suggestions made
    pub suggestions: usize,
    /// Accusations made, right or wrong
    pub accusations: usize,
    /// Accusations that eliminated the accuser
    pub wrong_accusations: usize,
}

impl MatchRecord {
    pub fn is_stalemate(&self) -> bool {
        self.winner.is_none()
    }
}

/// A match in progress.
#[derive(Debug)]
pub struct Match {
    deck: Arc<CardDeck>,
    deal: Deal,
    agents: Vec<KrAgent>,
    active: Vec<bool>,
    current: PlayerId,
    turns: usize,
    max_turns: usize,
    winner: Option<PlayerId>,
    finished: bool,
    suggestions: usize,
    accusations: usize,
    wrong_accusations: usize,
}

impl Match {
    /// Seat `agents` around the table and hand them their cards.
    ///
    /// Agent `i` must sit at seat `i`.
    pub fn new(deck: Arc<CardDeck>, deal: Deal, mut agents: Vec<KrAgent>, max_turns: usize) -> Result<Self> {
        let num_players = deal.num_players();
        if agents.len() != num_players {
            return Err(Error::InvalidConfiguration {
                message: format!("{} agents for {num_players} hands", agents.len()),
            });
        }
        for (index, agent) in agents.iter_mut().enumerate() {
            let seat = PlayerId::new(index);
            if agent.seat() != seat {
                return Err(Error::InvalidConfiguration {
                    message: format!("agent for {seat} sits at {}", agent.seat()),
                });
            }
            agent.init_knowledge(deal.hand(seat), num_players)?;
        }

        tracing::debug!(
            players = num_players,
            solution = %deck.describe(&deal.solution()),
            "match dealt"
        );
        Ok(Self {
            deck,
            deal,
            agents,
            active: vec![true; num_players],
            current: PlayerId::new(0),
            turns: 0,
            max_turns,
            winner: None,
            finished: false,
            suggestions: 0,
            accusations: 0,
            wrong_accusations: 0,
        })
    }

    /// Deal a random match for `config`, drawing all randomness from `rng`.
    pub fn from_config(config: &GameConfig, rng: &mut StdRng) -> Result<Self> {
        config.validate()?;
        let deck = config.deck()?.shared();
        let deal = Deal::random(&deck, config.players, rng)?;
        let agents = PlayerId::all(config.players)
            .map(|seat| {
                let agent_config = AgentConfig::new().with_seed(rng.random());
                KrAgent::new(seat, config.players, Arc::clone(&deck), agent_config)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(deck, deal, agents, config.max_turns)
    }

    pub fn deck(&self) -> &Arc<CardDeck> {
        &self.deck
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn agents(&self) -> &[KrAgent] {
        &self.agents
    }

    pub fn agent(&self, seat: PlayerId) -> Option<&KrAgent> {
        self.agents.get(seat.index())
    }

    /// Seat whose turn is next.
    pub fn current(&self) -> PlayerId {
        self.current
    }

    pub fn is_active(&self, seat: PlayerId) -> bool {
        self.active.get(seat.index()).copied().unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Play one turn for the current seat.
    ///
    /// The agent first brings its knowledge up to date. If it knows the
    /// solution it accuses; otherwise it moves, suggests, updates on the
    /// answer, and accuses if that settled it.
    pub fn play_turn(&mut self) -> Result<Vec<TurnEvent>> {
        if self.finished {
            return Err(Error::GameOver);
        }
        let seat = self.current;
        self.turns += 1;
        let mut events = Vec::new();

        let agent = &mut self.agents[seat.index()];
        agent.run_inference()?;
        if let Some(accusation) = agent.make_accusation() {
            events.push(self.resolve_accusation(seat, accusation)?);
        } else {
            let room = agent.choose_destination()?;
            let triple = agent.choose_suggestion(room)?;
            let outcome = self.resolve_suggestion(seat, triple)?;
            events.push(TurnEvent::Suggestion(outcome));

            let agent = &mut self.agents[seat.index()];
            agent.run_inference()?;
            if let Some(accusation) = agent.make_accusation() {
                events.push(self.resolve_accusation(seat, accusation)?);
            }
        }

        if !self.finished && self.turns >= self.max_turns {
            self.finished = true;
            tracing::info!(turns = self.turns, "match ended in stalemate");
        }
        if !self.finished {
            self.current = self.next_active(seat);
        }
        Ok(events)
    }

    /// Play until the match ends.
    pub fn play(&mut self) -> Result<MatchRecord> {
        self.run_with(|_| Ok(()))
    }

    /// Play until the match ends, passing every event to `on_event`.
    pub fn run_with<F>(&mut self, mut on_event: F) -> Result<MatchRecord>
    where
        F: FnMut(&TurnEvent) -> Result<()>,
    {
        while !self.finished {
            for event in self.play_turn()? {
                on_event(&event)?;
            }
        }
        Ok(self.record())
    }

    /// Summary of the match so far.
    pub fn record(&self) -> MatchRecord {
        MatchRecord {
            winner: self.winner,
            turns: self.turns,
            solution: self.deal.solution(),
            suggestions: self.suggestions,
            accusations: self.accusations,
            wrong_accusations: self.wrong_accusations,
        }
    }

    fn resolve_suggestion(&mut self, suggester: PlayerId, triple: Triple) -> Result<SuggestionOutcome> {
        let num_players = self.agents.len();
        let mut responder = None;
        let mut shown = None;

        let mut seat = suggester.next(num_players);
        while seat != suggester {
            if let Some(card) = self.agents[seat.index()].respond_to_suggestion(&triple) {
                responder = Some(seat);
                shown = Some(card);
                break;
            }
            seat = seat.next(num_players);
        }

        let outcome = SuggestionOutcome {
            triple,
            suggester,
            responder,
            shown,
        };
        for agent in &mut self.agents {
            let sees_card = agent.seat() == suggester || Some(agent.seat()) == responder;
            let view = if sees_card { outcome } else { outcome.redacted() };
            agent.record_suggestion_outcome(&view)?;
        }
        self.suggestions += 1;

        tracing::debug!(
            suggester = %suggester,
            suggestion = %self.deck.describe(&triple),
            responder = ?responder.map(PlayerId::index),
            "suggestion resolved"
        );
        Ok(outcome)
    }

    fn resolve_accusation(&mut self, accuser: PlayerId, triple: Triple) -> Result<TurnEvent> {
        let correct = triple == self.deal.solution();
        self.accusations += 1;

        if correct {
            self.winner = Some(accuser);
            self.finished = true;
            tracing::info!(winner = %accuser, turns = self.turns, "correct accusation");
        } else {
            self.wrong_accusations += 1;
            self.active[accuser.index()] = false;
            tracing::warn!(
                accuser = %accuser,
                accusation = %self.deck.describe(&triple),
                "wrong accusation"
            );
            for agent in &mut self.agents {
                agent.record_accusation_outcome(triple, false)?;
            }

            let remaining: Vec<PlayerId> = PlayerId::all(self.agents.len())
                .filter(|&seat| self.active[seat.index()])
                .collect();
            if let [last] = remaining.as_slice() {
                self.winner = Some(*last);
                self.finished = true;
            }
        }

        Ok(TurnEvent::Accusation(AccusationOutcome {
            triple,
            accuser,
            correct,
        }))
    }

    fn next_active(&self, after: PlayerId) -> PlayerId {
        let num_players = self.agents.len();
        let mut seat = after.next(num_players);
        while seat != after && !self.active[seat.index()] {
            seat = seat.next(num_players);
        }
        seat
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::cards::Category;

    fn fixed_match(max_turns: usize) -> Match {
        let deck = CardDeck::classic().shared();
        let solution = deck.triple("Miss Scarlet", "Rope", "Kitchen").unwrap();
        let rest: Vec<_> = deck.ids().filter(|&c| !solution.contains(c)).collect();
        let hands = vec![rest[..6].to_vec(), rest[6..12].to_vec(), rest[12..].to_vec()];
        let deal = Deal::new(&deck, solution, hands).unwrap();
        let agents = PlayerId::all(3)
            .map(|seat| {
                KrAgent::new(seat, 3, Arc::clone(&deck), AgentConfig::new().with_seed(seat.index() as u64))
                    .unwrap()
            })
            .collect();
        Match::new(deck, deal, agents, max_turns).unwrap()
    }

    #[test]
    fn agents_find_the_solution() {
        let mut game = fixed_match(500);
        let record = game.play().unwrap();

        assert!(record.winner.is_some());
        assert_eq!(record.wrong_accusations, 0);
        assert_eq!(record.accusations, 1);
        assert!(game.play_turn().is_err());
        for agent in game.agents() {
            assert!(agent.knowledge().contradictions().is_empty());
            assert!(agent.knowledge().candidates().contains(&record.solution));
        }
    }

    #[test]
    fn turn_limit_ends_in_stalemate() {
        let mut game = fixed_match(1);
        let record = game.play().unwrap();
        assert_eq!(record.turns, 1);
        assert!(record.is_stalemate());
        assert_eq!(record.suggestions, 1);
    }

    #[test]
    fn only_the_suggester_and_responder_see_the_card() {
        let mut game = fixed_match(500);
        let events = game.play_turn().unwrap();
        let TurnEvent::Suggestion(outcome) = events[0] else {
            panic!("first turn should be a suggestion");
        };
        assert_eq!(outcome.suggester, PlayerId::new(0));

        if let (Some(responder), Some(card)) = (outcome.responder, outcome.shown) {
            assert_eq!(game.deal().holder(card), Some(responder));
            let suggester = &mut game.agents[0];
            suggester.run_inference().unwrap();
            assert_eq!(
                suggester.knowledge().hand_status(responder, card),
                crate::knowledge::Knowledge::True
            );
        }
    }

    #[test]
    fn mismatched_seats_are_rejected() {
        let deck = CardDeck::classic().shared();
        let mut rng = StdRng::seed_from_u64(1);
        let deal = Deal::random(&deck, 3, &mut rng).unwrap();
        let agents = vec![
            KrAgent::new(PlayerId::new(1), 3, Arc::clone(&deck), AgentConfig::new()).unwrap(),
            KrAgent::new(PlayerId::new(0), 3, Arc::clone(&deck), AgentConfig::new()).unwrap(),
            KrAgent::new(PlayerId::new(2), 3, Arc::clone(&deck), AgentConfig::new()).unwrap(),
        ];
        assert!(Match::new(deck, deal, agents, 10).is_err());
    }

    #[test]
    fn random_matches_follow_the_config() {
        let config = GameConfig::new().with_players(4).with_deck(4, 5);
        let mut rng = StdRng::seed_from_u64(21);
        let game = Match::from_config(&config, &mut rng).unwrap();
        assert_eq!(game.agents().len(), 4);
        assert_eq!(game.deck().ids_in(Category::Weapon).len(), 5);
        assert_eq!(game.current(), PlayerId::new(0));
    }
}
