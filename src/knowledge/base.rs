//! Knowledge base: what one agent currently knows about cards and hands.

use std::{collections::BTreeSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    cards::{CardDeck, Category, Triple},
    identifiers::{CardId, PlayerId},
};

/// Tri-state knowledge of a single proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Knowledge {
    #[default]
    Unknown,
    True,
    False,
}

impl Knowledge {
    pub fn is_known(self) -> bool {
        self != Knowledge::Unknown
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Knowledge::Unknown => None,
            Knowledge::True => Some(true),
            Knowledge::False => Some(false),
        }
    }
}

impl From<bool> for Knowledge {
    fn from(value: bool) -> Self {
        if value {
            Knowledge::True
        } else {
            Knowledge::False
        }
    }
}

/// What a tri-state value is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// Whether the card is its category's solution member.
    Solution(CardId),
    /// Whether the player holds the card.
    Hand(PlayerId, CardId),
}

/// A rule tried to flip a value that was already known the other way.
/// The existing value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub subject: Subject,
    pub existing: Knowledge,
    pub attempted: Knowledge,
}

/// Per-agent knowledge state.
///
/// Invariants maintained by the inference rules:
/// 1. at most one card per category is `True` for the solution
/// 2. no candidate triple contains a card marked `False` for the solution
/// 3. a card held by a player is not in the solution and held by nobody else
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    deck: Arc<CardDeck>,
    num_players: usize,
    card_status: Vec<Knowledge>,
    hands: Vec<Vec<Knowledge>>,
    possible_disproofs: Vec<Vec<BTreeSet<CardId>>>,
    candidates: BTreeSet<Triple>,
    contradictions: Vec<Contradiction>,
}

impl KnowledgeBase {
    /// Fresh knowledge base: everything unknown, every triple a candidate.
    pub fn new(deck: Arc<CardDeck>, num_players: usize) -> Result<Self> {
        if num_players == 0 {
            return Err(Error::InvalidConfiguration {
                message: "a knowledge base needs at least one player".to_string(),
            });
        }
        let cards = deck.len();
        let candidates = deck.all_solutions().into_iter().collect();
        Ok(Self {
            num_players,
            card_status: vec![Knowledge::Unknown; cards],
            hands: vec![vec![Knowledge::Unknown; cards]; num_players],
            possible_disproofs: vec![Vec::new(); num_players],
            candidates,
            contradictions: Vec::new(),
            deck,
        })
    }

    pub fn deck(&self) -> &Arc<CardDeck> {
        &self.deck
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.num_players)
    }

    /// Whether the card is known to be (or not be) in the solution.
    pub fn card_status(&self, card: CardId) -> Knowledge {
        self.card_status
            .get(card.index())
            .copied()
            .unwrap_or_default()
    }

    /// Whether the player is known to hold the card.
    pub fn hand_status(&self, player: PlayerId, card: CardId) -> Knowledge {
        self.hands
            .get(player.index())
            .and_then(|hand| hand.get(card.index()))
            .copied()
            .unwrap_or_default()
    }

    /// Pending "one of these cards" sets for disproofs the player made.
    pub fn possible_disproofs(&self, player: PlayerId) -> &[BTreeSet<CardId>] {
        self.possible_disproofs
            .get(player.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triples still consistent with the evidence, in deterministic order.
    pub fn candidates(&self) -> &BTreeSet<Triple> {
        &self.candidates
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// The solution, once exactly one candidate remains.
    pub fn known_solution(&self) -> Option<Triple> {
        if self.candidates.len() == 1 {
            self.candidates.first().copied()
        } else {
            None
        }
    }

    pub fn contradictions(&self) -> &[Contradiction] {
        &self.contradictions
    }

    /// Card of the category known to be in the solution.
    pub fn solution_member(&self, category: Category) -> Option<CardId> {
        self.deck
            .ids_in(category)
            .iter()
            .copied()
            .find(|&card| self.card_status(card) == Knowledge::True)
    }

    /// Cards of the category whose solution status is still open.
    pub fn unknown_in(&self, category: Category) -> Vec<CardId> {
        self.deck
            .ids_in(category)
            .iter()
            .copied()
            .filter(|&card| self.card_status(card) == Knowledge::Unknown)
            .collect()
    }

    /// The last open card of a category with no known solution member, which
    /// must therefore be the solution member.
    pub(crate) fn closure_candidate(&self, category: Category) -> Option<CardId> {
        if self.solution_member(category).is_some() {
            return None;
        }
        match self.unknown_in(category).as_slice() {
            [last] => Some(*last),
            _ => None,
        }
    }

    /// Set the solution status of a card. Returns whether anything changed.
    pub(crate) fn set_card_status(&mut self, card: CardId, value: Knowledge) -> bool {
        let existing = self.card_status[card.index()];
        if existing == value {
            return false;
        }
        if existing.is_known() {
            self.record_contradiction(Subject::Solution(card), existing, value);
            return false;
        }
        self.card_status[card.index()] = value;
        true
    }

    /// Set whether a player holds a card. Returns whether anything changed.
    pub(crate) fn set_hand_status(&mut self, player: PlayerId, card: CardId, value: Knowledge) -> bool {
        let existing = self.hands[player.index()][card.index()];
        if existing == value {
            return false;
        }
        if existing.is_known() {
            self.record_contradiction(Subject::Hand(player, card), existing, value);
            return false;
        }
        self.hands[player.index()][card.index()] = value;
        true
    }

    fn record_contradiction(&mut self, subject: Subject, existing: Knowledge, attempted: Knowledge) {
        let description = match subject {
            Subject::Solution(card) => format!("{} in solution", self.deck.name(card)),
            Subject::Hand(player, card) => format!("{player} holds {}", self.deck.name(card)),
        };
        tracing::warn!(
            subject = %description,
            ?existing,
            ?attempted,
            "ignoring contradictory update"
        );
        self.contradictions.push(Contradiction {
            subject,
            existing,
            attempted,
        });
    }

    /// Keep only the candidates matching `keep`. Returns how many were removed.
    pub(crate) fn retain_candidates(&mut self, keep: impl Fn(&Triple) -> bool) -> usize {
        let before = self.candidates.len();
        self.candidates.retain(|triple| keep(triple));
        before - self.candidates.len()
    }

    pub(crate) fn remove_candidate(&mut self, triple: &Triple) -> bool {
        self.candidates.remove(triple)
    }

    pub(crate) fn add_disproof(&mut self, player: PlayerId, cards: BTreeSet<CardId>) {
        self.possible_disproofs[player.index()].push(cards);
    }

    pub(crate) fn disproofs_mut(&mut self, player: PlayerId) -> &mut Vec<BTreeSet<CardId>> {
        &mut self.possible_disproofs[player.index()]
    }

    /// Cards grouped by what is known about their solution status.
    pub fn summary(&self) -> KnowledgeSummary {
        let mut summary = KnowledgeSummary::default();
        for card in self.deck.ids() {
            let name = self.deck.name(card).to_string();
            match self.card_status(card) {
                Knowledge::True => summary.in_solution.push(name),
                Knowledge::False => summary.not_in_solution.push(name),
                Knowledge::Unknown => summary.unknown.push(name),
            }
        }
        summary.candidates = self.candidates.len();
        summary
    }
}

/// Snapshot of card knowledge, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub in_solution: Vec<String>,
    pub not_in_solution: Vec<String>,
    pub unknown: Vec<String>,
    pub candidates: usize,
}

impl fmt::Display for KnowledgeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, cards) in [
            ("In solution", &self.in_solution),
            ("Not in solution", &self.not_in_solution),
            ("Unknown", &self.unknown),
        ] {
            writeln!(f, "{title}:")?;
            for card in cards {
                writeln!(f, " - {card}")?;
            }
        }
        write!(f, "Candidate solutions: {}", self.candidates)
    }
}
