//! Summary figures of a finished run, from the banker's side of the table.
//!
//! Settled payouts are stored from the players' perspective, so every figure
//! here is negated: a positive profit means the banker came out ahead.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use super::simulation::SimulationRun;
use super::wager::{Spot, SPOTS};
use crate::poker::HandClass;

/// Number of bins in each rolling return distribution.
pub const ROLLING_BINS: usize = 8;

/// Banker profit on one betting spot.
#[derive(Debug, Clone, Serialize)]
pub struct SpotProfit {
    /// The betting spot.
    pub spot: Spot,
    /// Clipped banker profit summed over the run.
    pub profit: i64,
}

/// How often players were dealt one hand class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassCount {
    /// The hand class.
    pub class: HandClass,
    /// Player hands in this class.
    pub count: usize,
    /// Fraction of all player hands, 0-1.
    pub share: f64,
}

/// One bar of a return distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Midpoint of the bin, in dollars.
    pub centre: f64,
    /// Occurrence percentage, 0-100.
    pub percent: f64,
}

/// Distribution of banker returns over every run of `window` consecutive
/// rounds.
#[derive(Debug, Clone, Serialize)]
pub struct RollingDistribution {
    /// Rounds per window.
    pub window: usize,
    /// Number of windows summed.
    pub samples: usize,
    /// Worst window return.
    pub min: i64,
    /// Best window return.
    pub max: i64,
    /// Mean window return.
    pub mean: f64,
    /// Histogram of window returns, [`ROLLING_BINS`] bars.
    pub bins: Vec<HistogramBin>,
}

impl RollingDistribution {
    /// Sum `returns` over every window of `window` consecutive entries and
    /// bucket the sums into [`ROLLING_BINS`] equal-width bins. Returns `None`
    /// if there are fewer entries than the window.
    pub fn compute(returns: &[i64], window: usize) -> Option<Self> {
        if window == 0 || returns.len() < window {
            return None;
        }

        let mut prefix = Vec::with_capacity(returns.len() + 1);
        prefix.push(0i64);
        for &r in returns {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + r);
        }
        let sums: Vec<i64> = prefix.windows(window + 1).map(|w| w[window] - w[0]).collect();

        let min = *sums.iter().min()?;
        let max = *sums.iter().max()?;
        let mean = sums.iter().map(|&s| s as f64).sum::<f64>() / sums.len() as f64;

        // A flat distribution still gets a unit-wide range around its value
        let (lo, hi) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (hi - lo) / ROLLING_BINS as f64;

        let mut counts = [0usize; ROLLING_BINS];
        for &s in &sums {
            let bin = ((s as f64 - lo) / width) as usize;
            counts[bin.min(ROLLING_BINS - 1)] += 1;
        }

        let bins = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramBin {
                centre: lo + width * (i as f64 + 0.5),
                percent: count as f64 / sums.len() as f64 * 100.0,
            })
            .collect();

        Some(Self {
            window,
            samples: sums.len(),
            min,
            max,
            mean,
            bins,
        })
    }
}

/// Everything the console and JSON reports show.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Rounds simulated.
    pub rounds: usize,
    /// Player seats per round.
    pub players: usize,
    /// Capital the banker risked per round.
    pub bank_amount: i64,
    /// Seed the deal was drawn from.
    pub seed: u64,

    /// Banker profit after bank clipping.
    pub total_profit: i64,
    /// `total_profit` divided by `rounds`.
    pub profit_per_round: f64,

    /// Banker profit had every payout been covered in full.
    pub unclipped_profit: i64,
    /// `unclipped_profit` divided by `rounds`.
    pub unclipped_profit_per_round: f64,

    /// Clipped profit per spot, in settlement order.
    pub spots: Vec<SpotProfit>,
    /// Player hand-class frequencies, strongest first.
    pub hand_classes: Vec<ClassCount>,
    /// One distribution per configured window.
    pub rolling: Vec<RollingDistribution>,
}

impl SimulationReport {
    /// Summarize a run.
    pub fn from_run(run: &SimulationRun) -> Self {
        let rounds = run.rounds();
        let returns: Vec<i64> = run.round_totals().into_iter().map(|v| -v).collect();
        let total_profit: i64 = returns.iter().sum();
        let unclipped_profit = -run.payouts().par_iter().sum::<i64>();

        let spots = Spot::ALL
            .iter()
            .map(|&spot| SpotProfit {
                spot,
                profit: -run
                    .settled()
                    .par_chunks(SPOTS)
                    .map(|seat| seat[spot.index()])
                    .sum::<i64>(),
            })
            .collect();

        let mut counts = [0usize; 7];
        for value in run.player_values() {
            counts[HandClass::of(value).index()] += 1;
        }
        let player_hands = (rounds * run.players()) as f64;
        let hand_classes = HandClass::ALL
            .iter()
            .map(|&class| {
                let count = counts[class.index()];
                ClassCount {
                    class,
                    count,
                    share: count as f64 / player_hands,
                }
            })
            .collect();

        let rolling = run
            .config()
            .rolling_windows
            .iter()
            .filter_map(|&w| {
                let dist = RollingDistribution::compute(&returns, w);
                if dist.is_none() {
                    log::warn!("skipping {}-round window: only {} rounds simulated", w, rounds);
                }
                dist
            })
            .collect();

        Self {
            rounds,
            players: run.players(),
            bank_amount: run.config().bank_amount,
            seed: run.seed(),
            total_profit,
            profit_per_round: total_profit as f64 / rounds as f64,
            unclipped_profit,
            unclipped_profit_per_round: unclipped_profit as f64 / rounds as f64,
            spots,
            hand_classes,
            rolling,
        }
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Three Card Poker Player Banking ===")?;
        writeln!(
            f,
            "{} rounds, {} players, bank ${}, seed {}",
            self.rounds, self.players, self.bank_amount, self.seed
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Banker profit/loss:        ${} (${:.2} per round)",
            self.total_profit, self.profit_per_round
        )?;
        writeln!(
            f,
            "Unadjusted for bank limit: ${} (${:.2} per round)",
            self.unclipped_profit, self.unclipped_profit_per_round
        )?;

        writeln!(f, "\nProfit/loss per betting spot")?;
        for s in &self.spots {
            writeln!(f, "  {:<10} {:>12}", s.spot.name(), s.profit)?;
        }

        writeln!(f, "\nPlayer hands by type")?;
        for c in &self.hand_classes {
            writeln!(f, "  {:<15} {:>10} ({:.1}%)", c.class.name(), c.count, c.share * 100.0)?;
        }

        for dist in &self.rolling {
            writeln!(
                f,
                "\nReturn per {} rounds ({} windows, mean {:.1}, range {} to {})",
                dist.window, dist.samples, dist.mean, dist.min, dist.max
            )?;
            for bin in &dist.bins {
                writeln!(f, "  {:>12.0} {:>6.1}%", bin.centre, bin.percent)?;
            }
        }
        Ok(())
    }
}
