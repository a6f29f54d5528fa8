//! Error types for the Cluedo crate

use thiserror::Error;

use crate::cards::Category;

/// Main error type for the Cluedo crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown card id {id} (deck holds {deck_size} cards)")]
    UnknownCard { id: usize, deck_size: usize },

    #[error("no {category} card named '{name}'")]
    UnknownCardName { category: Category, name: String },

    #[error("unknown player {player} (game has {num_players} players)")]
    UnknownPlayer { player: usize, num_players: usize },

    #[error("card '{name}' is a {actual}, expected a {expected}")]
    CategoryMismatch {
        name: String,
        expected: Category,
        actual: Category,
    },

    #[error("duplicate {category} card '{name}'")]
    DuplicateCard { category: Category, name: String },

    #[error("deck has no {category} cards")]
    EmptyCategory { category: Category },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("shown card '{card}' is not part of the suggestion")]
    ShownCardNotSuggested { card: String },

    #[error("suggestion by the observing player was disproved by {responder} without a shown card")]
    MissingShownCard { responder: usize },

    #[error("player {player} cannot disprove their own suggestion")]
    SelfDisproof { player: usize },

    #[error("candidate solution set is empty after processing {fact}")]
    CandidatesExhausted { fact: String },

    #[error("game already over")]
    GameOver,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("a shared observer panicked while recording")]
    ObserverPoisoned,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
