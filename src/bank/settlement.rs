//! Clipping each round's payouts to the banker's capital.
//!
//! Within a round, spots are settled in a fixed order (seat 1..N, and
//! Play, Ante, Pair-Plus, 6-card within a seat). A running sum of absolute
//! payouts is compared with the bank amount: spots paid while the sum stays
//! below the bank are settled in full, the spot that crosses it gets the
//! remaining capital, and every later spot is void.

use rayon::prelude::*;

/// Settles rounds against a fixed bank amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankrollSettlement {
    bank_amount: i64,
}

impl BankrollSettlement {
    /// Create a settlement with `bank_amount` of capital per round.
    pub fn new(bank_amount: i64) -> Self {
        debug_assert!(bank_amount > 0);
        Self { bank_amount }
    }

    /// Capital per round.
    pub fn bank_amount(&self) -> i64 {
        self.bank_amount
    }

    /// Settle one round. `payouts` and `out` are in settlement order.
    pub fn settle_round(&self, payouts: &[i64], out: &mut [i64]) {
        debug_assert_eq!(payouts.len(), out.len());
        let bank = self.bank_amount;
        let mut covered = 0i64;

        for (&value, settled) in payouts.iter().zip(out.iter_mut()) {
            let total = covered.saturating_add(value.abs());
            *settled = if total < bank {
                value
            } else if covered < bank {
                (bank - covered) * value.signum()
            } else {
                0
            };
            covered = total;
        }
    }

    /// Settle a flat batch of rounds, `spots_per_round` values each, in
    /// parallel over rounds.
    pub fn settle_batch(&self, payouts: &[i64], spots_per_round: usize, out: &mut [i64]) {
        debug_assert_eq!(payouts.len(), out.len());
        debug_assert_eq!(payouts.len() % spots_per_round, 0);

        out.par_chunks_mut(spots_per_round)
            .zip(payouts.par_chunks(spots_per_round))
            .for_each(|(settled, round)| self.settle_round(round, settled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(bank: i64, payouts: &[i64]) -> Vec<i64> {
        let mut out = vec![0; payouts.len()];
        BankrollSettlement::new(bank).settle_round(payouts, &mut out);
        out
    }

    #[test]
    fn test_crossing_spot_gets_remainder() {
        assert_eq!(settle(5000, &[3000, -4000, 1000]), vec![3000, -2000, 0]);
    }

    #[test]
    fn test_within_bank_unchanged() {
        assert_eq!(settle(10000, &[3000, -4000, 1000]), vec![3000, -4000, 1000]);
    }

    #[test]
    fn test_first_spot_capped() {
        assert_eq!(settle(500, &[-1000, 20, 20]), vec![-500, 0, 0]);
        assert_eq!(settle(500, &[1000]), vec![500]);
    }

    #[test]
    fn test_exact_bank_is_capped() {
        // Reaching the bank exactly counts as exhausting it
        assert_eq!(settle(100, &[60, 40, 10]), vec![60, 40, 0]);
        assert_eq!(settle(100, &[100, 10]), vec![100, 0]);
    }

    #[test]
    fn test_zero_payouts_pass_through() {
        assert_eq!(settle(100, &[0, 0, 150, 0]), vec![0, 0, 100, 0]);
    }

    #[test]
    fn test_batch_is_per_round() {
        let payouts = [3000, -4000, 1000, 3000, -4000, 1000];
        let mut out = [0; 6];
        BankrollSettlement::new(5000).settle_batch(&payouts, 3, &mut out);
        assert_eq!(out, [3000, -2000, 0, 3000, -2000, 0]);
    }

    #[test]
    fn test_settled_magnitude_never_exceeds_bank() {
        let bank = 5000;
        let settlement = BankrollSettlement::new(bank);
        let payouts: Vec<i64> = (0..400).map(|i| ((i * 7919) % 2001 - 1000) * 20).collect();

        let mut out = vec![0; payouts.len()];
        settlement.settle_batch(&payouts, 20, &mut out);

        for (round, settled) in payouts.chunks(20).zip(out.chunks(20)) {
            let magnitude: i64 = settled.iter().map(|v| v.abs()).sum();
            assert!(magnitude <= bank);
            for (p, s) in round.iter().zip(settled) {
                assert!(s.abs() <= p.abs());
                assert!(*s == 0 || s.signum() == p.signum());
            }
        }
    }
}
