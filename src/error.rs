//! Error types for a simulation run.

use thiserror::Error;

use crate::bank::config::ConfigError;

/// Errors that abort a simulation run.
///
/// None of these are retried; a run either completes or fails as a whole.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Parameters rejected before anything was allocated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A dealt hand does not resolve to a rank key. Only reachable if card
    /// encoding or dealing is broken.
    #[error("hand {hand} has corrupt card encoding (prime product {product})")]
    CorruptHand {
        /// Flat index of the hand in the batch.
        hand: usize,
        /// The offending prime product.
        product: u32,
    },

    /// The dealer and player cards of a round do not form a valid 6-card hand.
    #[error("round {round}, player {player}: six-card hand cannot be evaluated")]
    CorruptSixCard {
        /// Round index.
        round: usize,
        /// Player seat (0-based).
        player: usize,
    },

    /// Working storage could not be allocated or mapped.
    #[error("failed to allocate working storage `{name}`: {source}")]
    Storage {
        /// Name of the array being allocated.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
