//! Dealing rounds of 3-card hands.
//!
//! Each round takes `3 * (players + 1)` cards from a fresh 52-card deck.
//! Hand 0 of a round is the dealer's; hands 1..=players go to the seats.
//! Rounds are dealt in parallel, one RNG per fixed-size chunk of rounds, so
//! a given seed always produces the same batch regardless of thread count.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use super::card::{Card, Deck};

/// Rounds dealt from one RNG stream.
pub const ROUNDS_PER_CHUNK: usize = 4096;

/// Cards per hand.
pub const HAND_SIZE: usize = 3;

/// Deals batches of rounds.
#[derive(Debug, Clone)]
pub struct HandDealer {
    players: usize,
    seed: u64,
    deck: Deck,
}

impl HandDealer {
    /// Create a dealer for `players` seats plus the dealer hand.
    pub fn new(players: usize, seed: u64) -> Self {
        debug_assert!(HAND_SIZE * (players + 1) <= 52, "not enough cards for {} players", players);
        Self {
            players,
            seed,
            deck: Deck::full(),
        }
    }

    /// Number of player seats.
    pub fn players(&self) -> usize {
        self.players
    }

    /// Cards dealt per round, dealer included.
    pub fn cards_per_round(&self) -> usize {
        HAND_SIZE * (self.players + 1)
    }

    /// Fill `out` with whole rounds. `out.len()` must be a multiple of
    /// [`cards_per_round`](Self::cards_per_round).
    pub fn deal(&self, out: &mut [Card]) {
        let per_round = self.cards_per_round();
        debug_assert_eq!(out.len() % per_round, 0);

        out.par_chunks_mut(per_round * ROUNDS_PER_CHUNK)
            .enumerate()
            .for_each(|(chunk, rounds)| {
                let mut rng = StdRng::seed_from_u64(chunk_seed(self.seed, chunk));
                for round in rounds.chunks_exact_mut(per_round) {
                    let mut cards = *self.deck.cards();
                    let (drawn, _) = cards.partial_shuffle(&mut rng, per_round);
                    round.copy_from_slice(drawn);
                }
            });
    }

    /// Deal `rounds` rounds into a new vector.
    pub fn deal_vec(&self, rounds: usize) -> Vec<Card> {
        let mut out = vec![Card::default(); rounds * self.cards_per_round()];
        self.deal(&mut out);
        out
    }
}

/// Seed for one chunk's RNG stream. The chunk index is spread with a
/// golden-ratio multiplier so neighbouring seeds never share a stream.
#[inline]
fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed ^ (chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_layout() {
        let dealer = HandDealer::new(4, 7);
        let cards = dealer.deal_vec(10);
        assert_eq!(cards.len(), 10 * 15);
    }

    #[test]
    fn test_cards_unique_within_round() {
        let dealer = HandDealer::new(16, 11);
        let cards = dealer.deal_vec(500);

        for round in cards.chunks_exact(dealer.cards_per_round()) {
            let mut raws: Vec<u32> = round.iter().map(|c| c.raw()).collect();
            raws.sort_unstable();
            raws.dedup();
            assert_eq!(raws.len(), 51, "a card was dealt twice in one round");
        }
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = HandDealer::new(5, 42).deal_vec(ROUNDS_PER_CHUNK + 17);
        let b = HandDealer::new(5, 42).deal_vec(ROUNDS_PER_CHUNK + 17);
        let c = HandDealer::new(5, 43).deal_vec(ROUNDS_PER_CHUNK + 17);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_adjacent_seeds_do_not_share_chunks() {
        let per_chunk = HandDealer::new(2, 0).cards_per_round() * ROUNDS_PER_CHUNK;
        let a = HandDealer::new(2, 42).deal_vec(2 * ROUNDS_PER_CHUNK);
        let b = HandDealer::new(2, 43).deal_vec(2 * ROUNDS_PER_CHUNK);

        for x in a.chunks_exact(per_chunk) {
            for y in b.chunks_exact(per_chunk) {
                assert_ne!(x, y, "seeds 42 and 43 replayed the same block of rounds");
            }
        }
    }

    #[test]
    fn test_chunk_seeds_distinct() {
        let mut seeds: Vec<u64> = (0..4u64)
            .flat_map(|seed| (0..64).map(move |chunk| chunk_seed(seed, chunk)))
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 4 * 64);
    }

    #[test]
    fn test_rounds_differ() {
        // Every round starts from a full deck but draws independently
        let dealer = HandDealer::new(1, 3);
        let cards = dealer.deal_vec(200);
        let first = &cards[..6];
        let repeats = cards.chunks_exact(6).filter(|r| *r == first).count();
        assert!(repeats < 3, "rounds should not repeat");
    }
}
