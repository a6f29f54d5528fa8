//! Forward-chaining inference over the agenda
//!
//! [`InferenceEngine::run`] drains the agenda breadth-first. Every fact is
//! processed at most once; the rule for its kind narrows the knowledge base
//! and may queue further facts. Rules only move values from unknown to known
//! and only remove candidates, so every run reaches a fixed point.

use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, AddAssign},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use super::{
    agenda::Agenda,
    base::{Knowledge, KnowledgeBase},
    fact::Fact,
};
use crate::{
    Error, Result,
    cards::{CardDeck, Category, Triple},
    identifiers::{CardId, PlayerId},
};

/// How much an inference pass learned.
///
/// `Decisive` outranks any count: it is produced when an undisproved
/// suggestion reveals the solution outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InformationGain {
    Facts(usize),
    Decisive,
}

impl InformationGain {
    pub const NONE: InformationGain = InformationGain::Facts(0);

    pub fn is_decisive(self) -> bool {
        self == InformationGain::Decisive
    }

    /// The number of derived facts, or `None` for a decisive pass.
    pub fn facts(self) -> Option<usize> {
        match self {
            InformationGain::Facts(count) => Some(count),
            InformationGain::Decisive => None,
        }
    }
}

impl Default for InformationGain {
    fn default() -> Self {
        Self::NONE
    }
}

impl Add for InformationGain {
    type Output = InformationGain;

    fn add(self, rhs: InformationGain) -> InformationGain {
        match (self, rhs) {
            (InformationGain::Facts(a), InformationGain::Facts(b)) => {
                InformationGain::Facts(a.saturating_add(b))
            }
            _ => InformationGain::Decisive,
        }
    }
}

impl AddAssign for InformationGain {
    fn add_assign(&mut self, rhs: InformationGain) {
        *self = *self + rhs;
    }
}

impl fmt::Display for InformationGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InformationGain::Facts(count) => write!(f, "{count} facts"),
            InformationGain::Decisive => f.write_str("decisive"),
        }
    }
}

/// Knowledge base plus agenda, owned by one agent.
///
/// Cloning produces a fully independent snapshot (the deck is shared, never
/// mutated), which is how the suggestion advisor runs hypotheticals without
/// touching live knowledge.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    kb: KnowledgeBase,
    agenda: Agenda,
    owner: PlayerId,
}

impl InferenceEngine {
    /// Fresh engine for the agent sitting at `owner`.
    pub fn new(deck: Arc<CardDeck>, num_players: usize, owner: PlayerId) -> Result<Self> {
        if owner.index() >= num_players {
            return Err(Error::UnknownPlayer {
                player: owner.index(),
                num_players,
            });
        }
        Ok(Self {
            kb: KnowledgeBase::new(deck, num_players)?,
            agenda: Agenda::new(),
            owner,
        })
    }

    /// Seat of the agent whose knowledge this is.
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn deck(&self) -> &Arc<CardDeck> {
        self.kb.deck()
    }

    /// Validate a fact and queue it.
    ///
    /// # Errors
    ///
    /// Fails on any card or player outside the configured game; nothing is
    /// queued in that case.
    pub fn assert_fact(&mut self, fact: Fact) -> Result<()> {
        fact.validate(self.kb.deck(), self.kb.num_players())?;
        self.agenda.push(fact);
        Ok(())
    }

    /// Queue a fact produced by a rule or by already-validated input.
    pub(crate) fn queue(&mut self, fact: Fact) {
        self.agenda.push(fact);
    }

    /// Drain the agenda, applying rules until no new facts remain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CandidatesExhausted`] if a rule removes the last
    /// candidate solution. The true solution can never be eliminated by
    /// consistent evidence, so this means the evidence or the rules are
    /// broken and the knowledge base must not be used further.
    pub fn run(&mut self) -> Result<InformationGain> {
        let mut gain = InformationGain::NONE;
        let mut processed = 0usize;

        while let Some(fact) = self.agenda.next() {
            tracing::trace!(fact = %fact.describe(self.kb.deck()), "applying rule");
            gain += self.apply(fact);
            processed += 1;

            if self.kb.candidate_count() == 0 {
                return Err(Error::CandidatesExhausted {
                    fact: fact.describe(self.kb.deck()),
                });
            }
        }

        tracing::debug!(
            owner = %self.owner,
            processed,
            %gain,
            candidates = self.kb.candidate_count(),
            "inference pass complete"
        );
        Ok(gain)
    }

    fn apply(&mut self, fact: Fact) -> InformationGain {
        let derived = match fact {
            Fact::InSolution(card) => self.in_solution(card),
            Fact::HeldBy(card, player) => self.held_by(card, player),
            Fact::NotHeldBy(card, player) => self.not_held_by(card, player),
            Fact::CouldNotDisprove(card, player) => self.could_not_disprove(card, player),
            Fact::Disproved(triple, player) => self.disproved(triple, player),
            Fact::NotDisproved(triple) => {
                self.not_disproved(triple);
                return InformationGain::Decisive;
            }
            Fact::IncorrectAccusation(triple) => self.incorrect_accusation(triple),
            Fact::NotInSolution(card) => self.not_in_solution(card),
        };
        InformationGain::Facts(derived)
    }

    // Nobody holds a solution card, its siblings are out, and only triples
    // containing it survive.
    fn in_solution(&mut self, card: CardId) -> usize {
        let deck = Arc::clone(self.kb.deck());
        let mut derived = usize::from(self.kb.set_card_status(card, Knowledge::True));

        for &sibling in deck.ids_in(deck.category(card)) {
            if sibling != card && self.kb.set_card_status(sibling, Knowledge::False) {
                derived += 1;
            }
        }

        for player in PlayerId::all(self.kb.num_players()) {
            if self.kb.set_hand_status(player, card, Knowledge::False) {
                derived += 1;
            }
            self.queue(Fact::NotHeldBy(card, player));
        }

        derived + self.kb.retain_candidates(|triple| triple.contains(card))
    }

    fn held_by(&mut self, card: CardId, player: PlayerId) -> usize {
        let mut derived = self.exclude_from_solution(card);

        if self.kb.set_hand_status(player, card, Knowledge::True) {
            derived += 1;
        }
        for other in PlayerId::all(self.kb.num_players()).filter(|&other| other != player) {
            if self.kb.set_hand_status(other, card, Knowledge::False) {
                derived += 1;
            }
            self.queue(Fact::NotHeldBy(card, other));
        }

        derived + self.close_category(self.kb.deck().category(card))
    }

    // A card the player lacks cannot explain any of their disproofs.
    fn not_held_by(&mut self, card: CardId, player: PlayerId) -> usize {
        let mut derived = usize::from(self.kb.set_hand_status(player, card, Knowledge::False));
        let mut resolved = Vec::new();
        let mut emptied = 0usize;

        self.kb.disproofs_mut(player).retain_mut(|cards| {
            if !cards.remove(&card) {
                return true;
            }
            derived += 1;
            match cards.len() {
                0 => {
                    emptied += 1;
                    false
                }
                1 => {
                    resolved.extend(cards.first().copied());
                    false
                }
                _ => true,
            }
        });

        if emptied > 0 {
            tracing::warn!(
                %player,
                card = self.kb.deck().name(card),
                emptied,
                "disproof left with no possible card"
            );
        }
        for shown in resolved {
            self.queue(Fact::HeldBy(shown, player));
        }
        derived
    }

    fn could_not_disprove(&mut self, card: CardId, player: PlayerId) -> usize {
        let derived = usize::from(self.kb.set_hand_status(player, card, Knowledge::False));
        self.queue(Fact::NotHeldBy(card, player));
        derived
    }

    // The player holds at least one of the triple's cards they are not
    // already known to lack.
    fn disproved(&mut self, triple: Triple, player: PlayerId) -> usize {
        let mut derived = 0;
        let already_explained = triple
            .cards()
            .iter()
            .any(|&card| self.kb.hand_status(player, card) == Knowledge::True);

        if !already_explained {
            let possible: BTreeSet<CardId> = triple
                .cards()
                .into_iter()
                .filter(|&card| self.kb.hand_status(player, card) != Knowledge::False)
                .collect();

            match possible.len() {
                0 => tracing::warn!(
                    %player,
                    suggestion = %self.kb.deck().describe(&triple),
                    "disproof by a player known to hold none of the cards"
                ),
                1 => {
                    if let Some(&shown) = possible.first() {
                        self.queue(Fact::HeldBy(shown, player));
                    }
                    derived += 1;
                }
                _ => {
                    self.kb.add_disproof(player, possible);
                    derived += 1;
                }
            }
        }

        if self.kb.remove_candidate(&triple) {
            derived += 1;
        }
        derived
    }

    // Nobody could disprove our own suggestion: every card we do not hold
    // ourselves is in the solution.
    fn not_disproved(&mut self, triple: Triple) {
        for card in triple.cards() {
            if self.kb.hand_status(self.owner, card) != Knowledge::True {
                self.kb.set_card_status(card, Knowledge::True);
                self.queue(Fact::InSolution(card));
            }
        }
    }

    fn incorrect_accusation(&mut self, triple: Triple) -> usize {
        let mut derived = usize::from(self.kb.remove_candidate(&triple));

        for category in Category::ALL {
            let others_in_solution = Category::ALL
                .into_iter()
                .filter(|&other| other != category)
                .all(|other| self.kb.card_status(triple.member(other)) == Knowledge::True);
            if others_in_solution {
                self.queue(Fact::NotInSolution(triple.member(category)));
                derived += 1;
            }
        }
        derived
    }

    fn not_in_solution(&mut self, card: CardId) -> usize {
        self.exclude_from_solution(card) + self.close_category(self.kb.deck().category(card))
    }

    fn exclude_from_solution(&mut self, card: CardId) -> usize {
        usize::from(self.kb.set_card_status(card, Knowledge::False))
            + self.kb.retain_candidates(|triple| !triple.contains(card))
    }

    // All but one card of the category ruled out: the last one is the answer.
    fn close_category(&mut self, category: Category) -> usize {
        match self.kb.closure_candidate(category) {
            Some(last) => {
                self.kb.set_card_status(last, Knowledge::True);
                self.queue(Fact::InSolution(last));
                1
            }
            None => 0,
        }
    }
}
