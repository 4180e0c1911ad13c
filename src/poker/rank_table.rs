//! Perfect-hash rank table for 3-card hands.
//!
//! Every unordered rank triple is keyed by the product of its rank primes,
//! which is unique by factorisation. The table stores the *unsuited* rank;
//! a monochrome hand subtracts [`FLUSH_OFFSET`] to land in the suited bands.
//!
//! With three cards, trips beat straights and straights beat flushes.
//!
//! | Band           | Ranks      | Count |
//! |----------------|------------|-------|
//! | Straight flush | 1-12       | 12    |
//! | Trips          | 13-25      | 13    |
//! | Straight       | 431-442    | 12    |
//! | Flush          | 443-716    | 274   |
//! | Pair           | 717-872    | 156   |
//! | High card      | 873-1146   | 274   |

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::RANK_PRIMES;

/// Distance between an unsuited band and its suited counterpart.
pub const FLUSH_OFFSET: i32 = 430;

/// Suited A-K-Q, the best hand.
pub const MIN_STRAIGHT_FLUSH: i32 = 1;
/// Suited 3-2-A.
pub const MAX_STRAIGHT_FLUSH: i32 = 12;
/// Three aces.
pub const MIN_TRIPS: i32 = 13;
/// Three deuces.
pub const MAX_TRIPS: i32 = 25;
/// Offsuit A-K-Q.
pub const MIN_STRAIGHT: i32 = MIN_STRAIGHT_FLUSH + FLUSH_OFFSET;
/// Offsuit 3-2-A.
pub const MAX_STRAIGHT: i32 = MAX_STRAIGHT_FLUSH + FLUSH_OFFSET;
/// Suited A-K-J.
pub const MIN_FLUSH: i32 = 443;
/// Suited 5-3-2.
pub const MAX_FLUSH: i32 = 716;
/// Pair of aces with a king.
pub const MIN_PAIR: i32 = 717;
/// Pair of deuces with a three.
pub const MAX_PAIR: i32 = 872;
/// Offsuit A-K-J.
pub const MIN_HIGH_CARD: i32 = MIN_FLUSH + FLUSH_OFFSET;
/// Offsuit 5-3-2, the worst hand.
pub const MAX_HIGH_CARD: i32 = MAX_FLUSH + FLUSH_OFFSET;

/// Weakest ace-high hand (A-4-2 offsuit).
pub const ACE_HIGH: i32 = 936;
/// Weakest king-high hand (K-3-2 offsuit).
pub const KING_HIGH: i32 = 990;
/// Weakest queen-high hand (Q-3-2 offsuit). The dealer qualifies at or below it.
pub const QUEEN_HIGH: i32 = 1034;

/// Number of unsuited keys stored in the table.
pub const TABLE_SIZE: usize = 455;

/// Number of distinct hand values once flushes are derived with
/// [`FLUSH_OFFSET`].
pub const DISTINCT_RANKS: usize = 741;

/// Strength class of an evaluated 3-card hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandClass {
    /// Suited A-K-Q, the single best hand.
    MiniRoyal,
    /// Any other three suited cards in sequence.
    StraightFlush,
    /// Three of a kind.
    Trips,
    /// Three cards in sequence, mixed suits.
    Straight,
    /// Three suited cards, not in sequence.
    Flush,
    /// One pair.
    Pair,
    /// None of the above.
    HighCard,
}

impl HandClass {
    /// All classes from strongest to weakest.
    pub const ALL: [HandClass; 7] = [
        HandClass::MiniRoyal,
        HandClass::StraightFlush,
        HandClass::Trips,
        HandClass::Straight,
        HandClass::Flush,
        HandClass::Pair,
        HandClass::HighCard,
    ];

    /// Classify an evaluated (suit-adjusted) value.
    pub fn of(value: i32) -> HandClass {
        match value {
            i32::MIN..=1 => HandClass::MiniRoyal,
            2..=MAX_STRAIGHT_FLUSH => HandClass::StraightFlush,
            MIN_TRIPS..=MAX_TRIPS => HandClass::Trips,
            // 26..=430 is unreachable; anything that strong is at least a straight
            26..=MAX_STRAIGHT => HandClass::Straight,
            MIN_FLUSH..=MAX_FLUSH => HandClass::Flush,
            MIN_PAIR..=MAX_PAIR => HandClass::Pair,
            _ => HandClass::HighCard,
        }
    }

    /// Get the class name.
    pub fn name(&self) -> &'static str {
        match self {
            HandClass::MiniRoyal => "Mini Royal",
            HandClass::StraightFlush => "Straight Flush",
            HandClass::Trips => "Trips",
            HandClass::Straight => "Straight",
            HandClass::Flush => "Flush",
            HandClass::Pair => "Pair",
            HandClass::HighCard => "High Card",
        }
    }

    /// Index into [`HandClass::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Unsuited rank lookup for every 3-card rank combination.
#[derive(Debug, Clone)]
pub struct RankTable {
    lookup: FxHashMap<u32, i32>,
}

static SHARED: OnceLock<RankTable> = OnceLock::new();

impl RankTable {
    /// Build the table.
    ///
    /// Straights and trips are reserved first. The high-card pass then walks
    /// every distinct triple in strength order and only takes keys that are
    /// still unclaimed, which skips the straights. Pairs are filled last.
    pub fn build() -> Self {
        let mut lookup: FxHashMap<u32, i32> =
            FxHashMap::with_capacity_and_hasher(TABLE_SIZE, Default::default());

        let mut rank = MIN_STRAIGHT_FLUSH;
        for top in (RANK_4_INDEX..13).rev() {
            lookup.insert(key(top, top - 1, top - 2), rank + FLUSH_OFFSET);
            rank += 1;
        }
        // Wheel: 3-2-A
        lookup.insert(key(1, 0, 12), rank + FLUSH_OFFSET);
        rank += 1;

        for trip in (0..13).rev() {
            lookup.insert(key(trip, trip, trip), rank);
            rank += 1;
        }
        debug_assert_eq!(rank, MAX_TRIPS + 1);

        let mut rank = MIN_HIGH_CARD;
        for c1 in (0..13).rev() {
            for c2 in (0..c1).rev() {
                for c3 in (0..c2).rev() {
                    let k = key(c1, c2, c3);
                    if !lookup.contains_key(&k) {
                        lookup.insert(k, rank);
                        rank += 1;
                    }
                }
            }
        }
        debug_assert_eq!(rank, MAX_HIGH_CARD + 1);

        let mut rank = MIN_PAIR;
        for pair in (0..13).rev() {
            for kicker in (0..13).rev().filter(|&k| k != pair) {
                lookup.insert(key(pair, pair, kicker), rank);
                rank += 1;
            }
        }
        debug_assert_eq!(rank, MAX_PAIR + 1);

        Self { lookup }
    }

    /// The process-wide table, built on first use.
    pub fn shared() -> &'static RankTable {
        SHARED.get_or_init(|| {
            let table = Self::build();
            log::debug!("built three-card rank table ({} keys)", table.len());
            table
        })
    }

    /// Unsuited rank for a prime product, or `None` for an invalid key.
    #[inline]
    pub fn lookup(&self, prime_product: u32) -> Option<i32> {
        self.lookup.get(&prime_product).copied()
    }

    /// Unsuited rank of three rank indices (0-12).
    pub fn rank_of(&self, r1: u8, r2: u8, r3: u8) -> Option<i32> {
        self.lookup(key(r1 as usize, r2 as usize, r3 as usize))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Iterate over `(prime_product, unsuited_rank)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.lookup.iter().map(|(&k, &v)| (k, v))
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::build()
    }
}

const RANK_4_INDEX: usize = 2;

#[inline]
fn key(r1: usize, r2: usize, r3: usize) -> u32 {
    RANK_PRIMES[r1] * RANK_PRIMES[r2] * RANK_PRIMES[r3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::card::*;

    fn band_count(table: &RankTable, lo: i32, hi: i32) -> usize {
        table.iter().filter(|&(_, r)| r >= lo && r <= hi).count()
    }

    #[test]
    fn test_table_size_and_bands() {
        let table = RankTable::build();
        assert_eq!(table.len(), TABLE_SIZE);

        assert_eq!(band_count(&table, MIN_STRAIGHT_FLUSH, MAX_STRAIGHT_FLUSH), 0);
        assert_eq!(band_count(&table, MIN_TRIPS, MAX_TRIPS), 13);
        assert_eq!(band_count(&table, MIN_STRAIGHT, MAX_STRAIGHT), 12);
        assert_eq!(band_count(&table, MIN_FLUSH, MAX_FLUSH), 0);
        assert_eq!(band_count(&table, MIN_PAIR, MAX_PAIR), 156);
        assert_eq!(band_count(&table, MIN_HIGH_CARD, MAX_HIGH_CARD), 274);
    }

    #[test]
    fn test_no_gaps_or_collisions() {
        let table = RankTable::build();
        let mut ranks: Vec<i32> = table.iter().map(|(_, r)| r).collect();
        ranks.sort_unstable();

        let expected: Vec<i32> = (MIN_TRIPS..=MAX_TRIPS)
            .chain(MIN_STRAIGHT..=MAX_STRAIGHT)
            .chain(MIN_PAIR..=MAX_HIGH_CARD)
            .collect();
        assert_eq!(ranks, expected);
    }

    #[test]
    fn test_every_rank_triple_present() {
        let table = RankTable::build();
        for r1 in 0..13u8 {
            for r2 in 0..13u8 {
                for r3 in 0..13u8 {
                    assert!(
                        table.rank_of(r1, r2, r3).is_some(),
                        "missing key for ranks {} {} {}",
                        r1,
                        r2,
                        r3
                    );
                }
            }
        }
    }

    #[test]
    fn test_ordering_across_bands() {
        let table = RankTable::build();
        let trips = table.rank_of(RANK_2, RANK_2, RANK_2).unwrap();
        let straight = table.rank_of(RANK_A, RANK_K, RANK_Q).unwrap();
        let pair = table.rank_of(RANK_A, RANK_A, RANK_K).unwrap();
        let high = table.rank_of(RANK_A, RANK_K, RANK_J).unwrap();

        assert!(trips < straight, "trips should beat a straight");
        assert!(straight < pair, "a straight should beat a pair");
        assert!(pair < high, "a pair should beat high card");

        // Best and worst inside bands
        assert_eq!(table.rank_of(RANK_A, RANK_A, RANK_A), Some(MIN_TRIPS));
        assert_eq!(table.rank_of(RANK_A, RANK_K, RANK_Q), Some(MIN_STRAIGHT));
        assert_eq!(table.rank_of(RANK_3, RANK_2, RANK_A), Some(MAX_STRAIGHT));
        assert_eq!(table.rank_of(RANK_A, RANK_A, RANK_K), Some(MIN_PAIR));
        assert_eq!(table.rank_of(RANK_2, RANK_2, RANK_3), Some(MAX_PAIR));
        assert_eq!(table.rank_of(RANK_A, RANK_K, RANK_J), Some(MIN_HIGH_CARD));
        assert_eq!(table.rank_of(RANK_5, RANK_3, RANK_2), Some(MAX_HIGH_CARD));
    }

    #[test]
    fn test_reference_thresholds() {
        let table = RankTable::build();
        assert_eq!(table.rank_of(RANK_A, RANK_4, RANK_2), Some(ACE_HIGH));
        assert_eq!(table.rank_of(RANK_K, RANK_3, RANK_2), Some(KING_HIGH));
        assert_eq!(table.rank_of(RANK_Q, RANK_3, RANK_2), Some(QUEEN_HIGH));

        // A-3-2 is a straight, so A-4-2 really is the floor for ace high
        assert_eq!(table.rank_of(RANK_A, RANK_3, RANK_2), Some(MAX_STRAIGHT));
    }

    #[test]
    fn test_hand_class() {
        assert_eq!(HandClass::of(1), HandClass::MiniRoyal);
        assert_eq!(HandClass::of(12), HandClass::StraightFlush);
        assert_eq!(HandClass::of(13), HandClass::Trips);
        assert_eq!(HandClass::of(442), HandClass::Straight);
        assert_eq!(HandClass::of(443), HandClass::Flush);
        assert_eq!(HandClass::of(872), HandClass::Pair);
        assert_eq!(HandClass::of(1146), HandClass::HighCard);
        assert_eq!(HandClass::ALL[HandClass::Flush.index()], HandClass::Flush);
    }

    #[test]
    fn test_shared_is_built_once() {
        let a = RankTable::shared() as *const RankTable;
        let b = RankTable::shared() as *const RankTable;
        assert_eq!(a, b);
    }
}
