//! Wager outcomes for every seat in every round.
//!
//! Each seat carries four bets against the banker, resolved to an integer
//! multiplier of the stake:
//!
//! - **Play**: +1 win, -1 loss, 0 for a fold, a tie, or a non-qualifying dealer
//! - **Ante**: -1 on a fold; otherwise +1 win, 0 tie, and a loss pushes when
//!   the dealer does not qualify
//! - **Pair-Plus**: pays on the player's hand alone, forfeited on a fold
//! - **6-card**: pays on the best 5 of the dealer's and player's six cards
//!
//! The player folds or plays by the house way, which looks at the player's
//! hand and the dealer's face-up card (the first card of the dealer hand).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::poker::card::{Card, RANK_2, RANK_3, RANK_4, RANK_A, RANK_K, RANK_Q};
use crate::poker::dealer::HAND_SIZE;
use crate::poker::five_card::{FiveCardBands, FiveCardOracle, LookupEvaluator};
use crate::poker::rank_table::{
    ACE_HIGH, KING_HIGH, MAX_FLUSH, MAX_PAIR, MAX_STRAIGHT, MAX_STRAIGHT_FLUSH, MAX_TRIPS, QUEEN_HIGH,
};
use crate::poker::HandEvaluator;

/// A betting spot, in settlement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spot {
    /// Raise matching the ante, made only when the player plays.
    Play,
    /// Compulsory opening bet.
    Ante,
    /// Bonus on the player's own hand.
    PairPlus,
    /// Bonus on the best 5 of the dealer's and player's cards.
    SixCard,
}

/// Number of spots per seat.
pub const SPOTS: usize = 4;

/// Largest multiplier any spot can pay (a 6-card royal flush).
pub const MAX_MULTIPLIER: i64 = 1000;

impl Spot {
    /// All spots in settlement order.
    pub const ALL: [Spot; SPOTS] = [Spot::Play, Spot::Ante, Spot::PairPlus, Spot::SixCard];

    /// Position within a seat's block of multipliers.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the spot name.
    pub fn name(&self) -> &'static str {
        match self {
            Spot::Play => "Play",
            Spot::Ante => "Ante",
            Spot::PairPlus => "Pair-Plus",
            Spot::SixCard => "6-Card",
        }
    }
}

/// The four multipliers for one seat in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WagerOutcome {
    /// Play multiplier: -1, 0 or 1.
    pub play: i32,
    /// Ante multiplier: -1, 0 or 1.
    pub ante: i32,
    /// Pair-Plus multiplier from the pay table.
    pub pair_plus: i32,
    /// 6-card bonus multiplier from the pay table.
    pub six_card: i32,
}

impl WagerOutcome {
    /// Multipliers in settlement order.
    pub fn as_array(&self) -> [i32; SPOTS] {
        [self.play, self.ante, self.pair_plus, self.six_card]
    }

    /// Multiplier for one spot.
    pub fn get(&self, spot: Spot) -> i32 {
        self.as_array()[spot.index()]
    }
}

/// House-way play thresholds and dealer qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseWay {
    /// Always play at or below this value.
    pub ace_high: i32,
    /// Play at or below this value unless the dealer shows an ace.
    pub king_high: i32,
    /// Play at or below this value if the dealer shows queen or lower.
    /// Also the dealer's qualifying hand.
    pub queen_high: i32,
}

impl Default for HouseWay {
    fn default() -> Self {
        Self {
            ace_high: ACE_HIGH,
            king_high: KING_HIGH,
            queen_high: QUEEN_HIGH,
        }
    }
}

impl HouseWay {
    /// Derive the thresholds by evaluating the weakest A-, K- and Q-high hands.
    pub fn from_evaluator(evaluator: &HandEvaluator<'_>) -> Option<Self> {
        let weakest = |top: u8, mid: u8| {
            // Offsuit so the flush adjustment never applies
            evaluator.evaluate(&[Card::new(top, 0), Card::new(mid, 1), Card::new(RANK_2, 1)])
        };
        Some(Self {
            ace_high: weakest(RANK_A, RANK_4)?,
            king_high: weakest(RANK_K, RANK_3)?,
            queen_high: weakest(RANK_Q, RANK_3)?,
        })
    }

    /// Whether a player holding `value` makes the Play bet.
    #[inline]
    pub fn plays(&self, value: i32, face_up: Card) -> bool {
        value <= self.ace_high
            || (value <= self.king_high && face_up.rank() < RANK_A)
            || (value <= self.queen_high && face_up.rank() < RANK_K)
    }

    /// Whether the dealer's hand is queen high or better.
    #[inline]
    pub fn dealer_qualifies(&self, dealer_value: i32) -> bool {
        dealer_value <= self.queen_high
    }
}

/// Pair-Plus multiple for a played hand.
///
/// Bands are swept from weakest to strongest so the strongest matching
/// bound decides. Only the single best hand (value 1) pays 50.
#[inline]
pub fn pair_plus_multiple(value: i32) -> i32 {
    if value > MAX_PAIR {
        -1
    } else if value > MAX_FLUSH {
        1
    } else if value > MAX_STRAIGHT {
        3
    } else if value > MAX_TRIPS {
        6
    } else if value > MAX_STRAIGHT_FLUSH {
        30
    } else if value > 1 {
        40
    } else {
        50
    }
}

/// 6-card bonus multiple for a 5-card strength.
#[inline]
pub fn six_card_multiple(rank: i32, bands: &FiveCardBands) -> i32 {
    if rank > bands.max_trips {
        -1
    } else if rank > bands.max_straight {
        5
    } else if rank > bands.max_flush {
        10
    } else if rank > bands.max_full_house {
        15
    } else if rank > bands.max_quads {
        25
    } else if rank > bands.max_straight_flush {
        50
    } else if rank > 1 {
        200
    } else {
        MAX_MULTIPLIER as i32
    }
}

/// Resolves every seat's wagers for whole batches of rounds.
#[derive(Debug, Clone)]
pub struct WagerEngine<O: FiveCardOracle = LookupEvaluator> {
    house: HouseWay,
    oracle: O,
    bands: FiveCardBands,
}

impl WagerEngine<LookupEvaluator> {
    /// Engine with the default house way and the built-in 5-card evaluator.
    pub fn new() -> Self {
        Self::with_oracle(HouseWay::default(), LookupEvaluator::new())
    }
}

impl Default for WagerEngine<LookupEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: FiveCardOracle> WagerEngine<O> {
    /// Engine with custom thresholds and 5-card oracle.
    pub fn with_oracle(house: HouseWay, oracle: O) -> Self {
        let bands = oracle.bands();
        Self { house, oracle, bands }
    }

    /// House-way thresholds in use.
    pub fn house(&self) -> &HouseWay {
        &self.house
    }

    /// Resolve one seat. `dealer` and `player` are the 3-card hands, with
    /// the dealer's face-up card first. Returns `None` if the six cards
    /// cannot be evaluated.
    pub fn resolve(&self, dealer_value: i32, dealer: &[Card], player_value: i32, player: &[Card]) -> Option<WagerOutcome> {
        let played = self.house.plays(player_value, dealer[0]);

        // Lower is stronger: positive when the player wins
        let win_lose = (dealer_value - player_value).signum();
        let qualifies = self.house.dealer_qualifies(dealer_value);

        let pair_plus = if played { pair_plus_multiple(player_value) } else { -1 };

        let ante = if !played {
            -1
        } else if win_lose >= 0 {
            win_lose
        } else if qualifies {
            -1
        } else {
            0
        };

        let play = if played && qualifies { win_lose } else { 0 };

        let six = [dealer[0], dealer[1], dealer[2], player[0], player[1], player[2]];
        let six_card = six_card_multiple(self.oracle.best_of_six(&six)?, &self.bands);

        Some(WagerOutcome {
            play,
            ante,
            pair_plus,
            six_card,
        })
    }

    /// Resolve every seat of one round into `out` (`players * SPOTS` values,
    /// seat-major, spots in settlement order).
    pub fn resolve_round(
        &self,
        round: usize,
        cards: &[Card],
        values: &[i32],
        out: &mut [i32],
    ) -> Result<(), SimulationError> {
        let dealer = &cards[..HAND_SIZE];
        let dealer_value = values[0];

        for (player, seat) in out.chunks_exact_mut(SPOTS).enumerate() {
            let hand = &cards[HAND_SIZE * (player + 1)..HAND_SIZE * (player + 2)];
            let outcome = self
                .resolve(dealer_value, dealer, values[player + 1], hand)
                .ok_or(SimulationError::CorruptSixCard { round, player })?;
            seat.copy_from_slice(&outcome.as_array());
        }
        Ok(())
    }

    /// Resolve a whole batch in parallel over rounds.
    ///
    /// `cards` holds `rounds * (players + 1)` hands, `values` their
    /// evaluations, and `out` receives `rounds * players * SPOTS` multipliers.
    pub fn resolve_batch(
        &self,
        cards: &[Card],
        values: &[i32],
        players: usize,
        out: &mut [i32],
    ) -> Result<(), SimulationError> {
        let hands = players + 1;
        debug_assert_eq!(cards.len(), values.len() * HAND_SIZE);
        debug_assert_eq!(out.len(), values.len() / hands * players * SPOTS);

        out.par_chunks_mut(players * SPOTS)
            .zip(cards.par_chunks(hands * HAND_SIZE))
            .zip(values.par_chunks(hands))
            .enumerate()
            .try_for_each(|(round, ((seats, cards), values))| self.resolve_round(round, cards, values, seats))
    }
}
