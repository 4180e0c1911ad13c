//! Batch evaluation of 3-card hands.
//!
//! A hand's value is its unsuited rank from the [`RankTable`], minus
//! [`FLUSH_OFFSET`] when all three cards share a suit. Lower is stronger and
//! values compare directly across all bands.

use rayon::prelude::*;

use super::card::{Card, SUIT_MASK};
use super::rank_table::{RankTable, FLUSH_OFFSET};
use crate::error::SimulationError;

/// Hand evaluator for 3-card hands.
#[derive(Debug, Clone, Copy)]
pub struct HandEvaluator<'t> {
    table: &'t RankTable,
}

impl HandEvaluator<'static> {
    /// Evaluator backed by the process-wide rank table.
    pub fn shared() -> Self {
        Self::new(RankTable::shared())
    }
}

impl Default for HandEvaluator<'static> {
    fn default() -> Self {
        Self::shared()
    }
}

impl<'t> HandEvaluator<'t> {
    /// Create a new hand evaluator over a table.
    pub fn new(table: &'t RankTable) -> Self {
        Self { table }
    }

    /// The rank table in use.
    pub fn table(&self) -> &'t RankTable {
        self.table
    }

    /// Prime product of a hand. Doubles as its rank key.
    #[inline]
    pub fn prime_product(hand: &[Card]) -> u32 {
        hand.iter().fold(1u32, |acc, c| acc.wrapping_mul(c.prime()))
    }

    /// Whether every card shares a suit bit.
    #[inline]
    pub fn is_flush(hand: &[Card]) -> bool {
        hand.iter().fold(SUIT_MASK, |acc, c| acc & c.raw()) != 0
    }

    /// Evaluate a single hand. `None` means the cards are corrupt.
    #[inline]
    pub fn evaluate(&self, hand: &[Card]) -> Option<i32> {
        let unsuited = self.table.lookup(Self::prime_product(hand))?;
        Some(if Self::is_flush(hand) { unsuited - FLUSH_OFFSET } else { unsuited })
    }

    /// Evaluate a flat batch of hands (3 cards each) into `out`.
    ///
    /// Fails on the first hand whose key is not in the table.
    pub fn evaluate_batch(&self, cards: &[Card], out: &mut [i32]) -> Result<(), SimulationError> {
        debug_assert_eq!(cards.len(), out.len() * 3);

        out.par_iter_mut()
            .zip(cards.par_chunks_exact(3))
            .enumerate()
            .try_for_each(|(i, (value, hand))| {
                *value = self.evaluate(hand).ok_or(SimulationError::CorruptHand {
                    hand: i,
                    product: Self::prime_product(hand),
                })?;
                Ok(())
            })
    }
}
