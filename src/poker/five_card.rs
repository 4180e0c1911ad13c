//! Five-card hand strength, used by the 6-card bonus.
//!
//! The bonus needs the best 5-card hand out of the dealer's and a player's
//! six cards. Any evaluator that exposes a scalar strength (lower = stronger)
//! and the band boundaries can be plugged in through [`FiveCardOracle`].
//! [`LookupEvaluator`] is the built-in one: a perfect hash of all 7462
//! distinct 5-card hands keyed by rank-prime product, with a separate table
//! for flushes.

use rustc_hash::FxHashMap;

use super::card::{Card, RANK_PRIMES, SUIT_MASK};

/// Upper bounds (inclusive) of each 5-card band. Lower = stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiveCardBands {
    /// Weakest straight flush.
    pub max_straight_flush: i32,
    /// Weakest four of a kind.
    pub max_quads: i32,
    /// Weakest full house.
    pub max_full_house: i32,
    /// Weakest flush.
    pub max_flush: i32,
    /// Weakest straight.
    pub max_straight: i32,
    /// Weakest three of a kind.
    pub max_trips: i32,
}

/// Something that can rank the best 5 cards out of 6.
pub trait FiveCardOracle: Send + Sync {
    /// Strength of the best 5-card subset, or `None` if the cards do not
    /// form a valid hand.
    fn best_of_six(&self, cards: &[Card; 6]) -> Option<i32>;

    /// Band boundaries for the values returned by [`best_of_six`](Self::best_of_six).
    fn bands(&self) -> FiveCardBands;
}

/// Weakest straight flush (5-4-3-2-A suited).
pub const MAX_STRAIGHT_FLUSH: i32 = 10;
/// Weakest four of a kind (four deuces, three kicker).
pub const MAX_FOUR_OF_A_KIND: i32 = 166;
/// Weakest full house (deuces full of threes).
pub const MAX_FULL_HOUSE: i32 = 322;
/// Weakest flush (7-5-4-3-2 suited).
pub const MAX_FLUSH: i32 = 1599;
/// Weakest straight (5-4-3-2-A).
pub const MAX_STRAIGHT: i32 = 1609;
/// Weakest three of a kind.
pub const MAX_THREE_OF_A_KIND: i32 = 2467;
/// Weakest two pair.
pub const MAX_TWO_PAIR: i32 = 3325;
/// Weakest one pair.
pub const MAX_PAIR: i32 = 6185;
/// Worst 5-card hand (7-5-4-3-2 offsuit).
pub const MAX_HIGH_CARD: i32 = 7462;

/// Hand rank categories, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum HandCategory {
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    HighCard,
}

impl HandCategory {
    /// Category of a 5-card rank.
    pub fn of(rank: i32) -> HandCategory {
        match rank {
            i32::MIN..=MAX_STRAIGHT_FLUSH => HandCategory::StraightFlush,
            11..=MAX_FOUR_OF_A_KIND => HandCategory::FourOfAKind,
            167..=MAX_FULL_HOUSE => HandCategory::FullHouse,
            323..=MAX_FLUSH => HandCategory::Flush,
            1600..=MAX_STRAIGHT => HandCategory::Straight,
            1610..=MAX_THREE_OF_A_KIND => HandCategory::ThreeOfAKind,
            2468..=MAX_TWO_PAIR => HandCategory::TwoPair,
            3326..=MAX_PAIR => HandCategory::OnePair,
            _ => HandCategory::HighCard,
        }
    }

    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// Table-driven 5-card evaluator.
#[derive(Debug, Clone)]
pub struct LookupEvaluator {
    /// Suited hands: prime product -> rank
    flush: FxHashMap<u32, i32>,
    /// Everything else: prime product -> rank
    unsuited: FxHashMap<u32, i32>,
}

impl LookupEvaluator {
    /// Build both tables.
    pub fn new() -> Self {
        let mut flush = FxHashMap::with_capacity_and_hasher(1287, Default::default());
        let mut unsuited = FxHashMap::with_capacity_and_hasher(6175, Default::default());

        let straights = straight_ranks();
        let distinct = distinct_fives(&straights);

        // Straight flushes 1-10, straights 1600-1609
        for (i, ranks) in straights.iter().enumerate() {
            flush.insert(product(ranks), 1 + i as i32);
            unsuited.insert(product(ranks), MAX_FLUSH + 1 + i as i32);
        }

        // Flushes 323-1599, high cards 6186-7462
        for (i, ranks) in distinct.iter().enumerate() {
            flush.insert(product(ranks), MAX_FULL_HOUSE + 1 + i as i32);
            unsuited.insert(product(ranks), MAX_PAIR + 1 + i as i32);
        }

        let mut rank = MAX_STRAIGHT_FLUSH + 1;
        for quad in (0..13).rev() {
            for kicker in others(&[quad]) {
                unsuited.insert(product(&[quad, quad, quad, quad, kicker]), rank);
                rank += 1;
            }
        }

        for trip in (0..13).rev() {
            for pair in others(&[trip]) {
                unsuited.insert(product(&[trip, trip, trip, pair, pair]), rank);
                rank += 1;
            }
        }
        debug_assert_eq!(rank, MAX_FULL_HOUSE + 1);

        let mut rank = MAX_STRAIGHT + 1;
        for trip in (0..13).rev() {
            let kickers = others(&[trip]);
            for (i, &k1) in kickers.iter().enumerate() {
                for &k2 in &kickers[i + 1..] {
                    unsuited.insert(product(&[trip, trip, trip, k1, k2]), rank);
                    rank += 1;
                }
            }
        }

        for high in (0..13).rev() {
            for low in (0..high).rev() {
                for kicker in others(&[high, low]) {
                    unsuited.insert(product(&[high, high, low, low, kicker]), rank);
                    rank += 1;
                }
            }
        }

        for pair in (0..13).rev() {
            let kickers = others(&[pair]);
            for (i, &k1) in kickers.iter().enumerate() {
                for (j, &k2) in kickers.iter().enumerate().skip(i + 1) {
                    for &k3 in &kickers[j + 1..] {
                        unsuited.insert(product(&[pair, pair, k1, k2, k3]), rank);
                        rank += 1;
                    }
                }
            }
        }
        debug_assert_eq!(rank, MAX_PAIR + 1);

        Self { flush, unsuited }
    }

    /// Evaluate a 5-card hand. Returns `None` for an impossible hand.
    #[inline]
    pub fn evaluate_5(&self, cards: &[Card; 5]) -> Option<i32> {
        let mut suit = SUIT_MASK;
        let mut product = 1u32;
        for card in cards {
            suit &= card.raw();
            product = product.wrapping_mul(card.prime());
        }

        if suit != 0 {
            self.flush.get(&product).copied()
        } else {
            self.unsuited.get(&product).copied()
        }
    }

    /// Number of distinct hand ranks.
    pub fn distinct_ranks(&self) -> usize {
        let mut ranks: Vec<i32> = self.flush.values().chain(self.unsuited.values()).copied().collect();
        ranks.sort_unstable();
        ranks.dedup();
        ranks.len()
    }
}

impl Default for LookupEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl FiveCardOracle for LookupEvaluator {
    fn best_of_six(&self, cards: &[Card; 6]) -> Option<i32> {
        let mut best = i32::MAX;

        // Try all 6 combinations of 5 cards from 6
        for skip in 0..6 {
            let mut hand = [Card::default(); 5];
            let mut n = 0;
            for (i, &card) in cards.iter().enumerate() {
                if i != skip {
                    hand[n] = card;
                    n += 1;
                }
            }
            best = best.min(self.evaluate_5(&hand)?);
        }

        Some(best)
    }

    fn bands(&self) -> FiveCardBands {
        FiveCardBands {
            max_straight_flush: MAX_STRAIGHT_FLUSH,
            max_quads: MAX_FOUR_OF_A_KIND,
            max_full_house: MAX_FULL_HOUSE,
            max_flush: MAX_FLUSH,
            max_straight: MAX_STRAIGHT,
            max_trips: MAX_THREE_OF_A_KIND,
        }
    }
}

/// The ten straights, best first, each as rank indices.
fn straight_ranks() -> Vec<[usize; 5]> {
    let mut straights: Vec<[usize; 5]> = (4..13)
        .rev()
        .map(|top| [top, top - 1, top - 2, top - 3, top - 4])
        .collect();
    // Wheel: 5-4-3-2-A
    straights.push([3, 2, 1, 0, 12]);
    straights
}

/// Every set of five distinct ranks that is not a straight, best first.
fn distinct_fives(straights: &[[usize; 5]]) -> Vec<[usize; 5]> {
    let mask = |ranks: &[usize; 5]| ranks.iter().fold(0u16, |m, &r| m | 1 << r);
    let straight_masks: Vec<u16> = straights.iter().map(mask).collect();

    let mut out = Vec::with_capacity(1277);
    for a in (0..13).rev() {
        for b in (0..a).rev() {
            for c in (0..b).rev() {
                for d in (0..c).rev() {
                    for e in (0..d).rev() {
                        let ranks = [a, b, c, d, e];
                        if !straight_masks.contains(&mask(&ranks)) {
                            out.push(ranks);
                        }
                    }
                }
            }
        }
    }
    out
}

/// Ranks not in `used`, best first.
fn others(used: &[usize]) -> Vec<usize> {
    (0..13).rev().filter(|r| !used.contains(r)).collect()
}

fn product(ranks: &[usize]) -> u32 {
    ranks.iter().map(|&r| RANK_PRIMES[r]).product()
}
