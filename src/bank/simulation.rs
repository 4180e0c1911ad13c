//! End-to-end simulation driver.
//!
//! A run goes through five stages over one batch of rounds:
//!
//! 1. deal `rounds * (players + 1)` hands
//! 2. evaluate every hand against the rank table
//! 3. resolve each seat's four wagers to multipliers
//! 4. scale multipliers by the stakes into dollar payouts
//! 5. clip each round's payouts to the bank amount
//!
//! Every stage is parallel over rounds. All arrays live in one
//! [`Workspace`] and are released when the returned [`SimulationRun`] drops.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::config::SimulationConfig;
use super::settlement::BankrollSettlement;
use super::storage::{Buffer, Workspace};
use super::wager::{Spot, WagerEngine, SPOTS};
use crate::error::SimulationError;
use crate::poker::dealer::HAND_SIZE;
use crate::poker::{Card, HandDealer, HandEvaluator};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Drawing every round's hands.
    Dealing,
    /// Looking up hand values.
    Evaluating,
    /// Turning hands into wager multipliers.
    Resolving,
    /// Scaling multipliers by the stakes.
    Staking,
    /// Clipping payouts to the bank.
    Settling,
}

impl Stage {
    /// All stages in order.
    pub const ALL: [Stage; 5] = [
        Stage::Dealing,
        Stage::Evaluating,
        Stage::Resolving,
        Stage::Staking,
        Stage::Settling,
    ];

    /// Get the stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Dealing => "dealing",
            Stage::Evaluating => "evaluating",
            Stage::Resolving => "resolving wagers",
            Stage::Staking => "applying stakes",
            Stage::Settling => "settling",
        }
    }
}

/// Runs simulations for one validated configuration.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Create a simulator. Fails if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<SimulationRun, SimulationError> {
        self.run_with_callback(|_, _| {})
    }

    /// Run the whole pipeline, calling `callback` after each stage with the
    /// time it took.
    pub fn run_with_callback<F>(&self, mut callback: F) -> Result<SimulationRun, SimulationError>
    where
        F: FnMut(Stage, Duration),
    {
        let config = &self.config;
        let rounds = config.rounds;
        let players = config.players;
        let hands = config.total_hands();
        let spots = rounds * players * SPOTS;
        let total_start = Instant::now();

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                log::info!("no seed configured, using {}", seed);
                seed
            }
        };

        let workspace = Workspace::for_batch(&config.storage, hands)?;
        log::info!(
            "simulating {} rounds x {} players ({} hands, {} storage)",
            rounds,
            players,
            hands,
            if workspace.is_mapped() { "mapped" } else { "heap" }
        );

        let mut cards: Buffer<Card> = workspace.allocate("hands", hands * HAND_SIZE)?;
        let mut values: Buffer<i32> = workspace.allocate("values", hands)?;
        let mut multipliers: Buffer<i32> = workspace.allocate("multipliers", spots)?;
        let mut payouts: Buffer<i64> = workspace.allocate("payouts", spots)?;
        let mut settled: Buffer<i64> = workspace.allocate("settled", spots)?;

        let mut stage = |stage: Stage, start: Instant| {
            let elapsed = start.elapsed();
            log::info!("{} done in {:.3}s", stage.name(), elapsed.as_secs_f64());
            callback(stage, elapsed);
        };

        let start = Instant::now();
        HandDealer::new(players, seed).deal(&mut cards);
        stage(Stage::Dealing, start);

        let start = Instant::now();
        HandEvaluator::shared().evaluate_batch(&cards, &mut values)?;
        stage(Stage::Evaluating, start);

        let start = Instant::now();
        let engine = WagerEngine::new();
        log::debug!("house way {:?}", engine.house());
        engine.resolve_batch(&cards, &values, players, &mut multipliers)?;
        stage(Stage::Resolving, start);

        let start = Instant::now();
        let stakes = config.stakes.as_array();
        payouts
            .par_chunks_mut(SPOTS)
            .zip(multipliers.par_chunks(SPOTS))
            .for_each(|(dollars, multiples)| {
                for ((d, &m), &stake) in dollars.iter_mut().zip(multiples).zip(&stakes) {
                    *d = m as i64 * stake;
                }
            });
        stage(Stage::Staking, start);

        let start = Instant::now();
        BankrollSettlement::new(config.bank_amount).settle_batch(&payouts, players * SPOTS, &mut settled);
        stage(Stage::Settling, start);

        log::info!("simulation finished in {:.3}s", total_start.elapsed().as_secs_f64());

        Ok(SimulationRun {
            config: config.clone(),
            seed,
            cards,
            values,
            multipliers,
            payouts,
            settled,
            workspace,
        })
    }
}

/// The arrays produced by one run.
///
/// Hands are stored round-major with the dealer first: each round is the
/// dealer's hand followed by one hand per seat. Per-spot arrays are
/// `[round][seat][spot]` with spots in [`Spot`] order.
#[derive(Debug)]
pub struct SimulationRun {
    config: SimulationConfig,
    seed: u64,
    cards: Buffer<Card>,
    values: Buffer<i32>,
    multipliers: Buffer<i32>,
    payouts: Buffer<i64>,
    settled: Buffer<i64>,
    // Dropped after the buffers that live in it
    workspace: Workspace,
}

impl SimulationRun {
    /// Configuration of the run.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed the hands were dealt with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rounds.
    pub fn rounds(&self) -> usize {
        self.config.rounds
    }

    /// Number of player seats.
    pub fn players(&self) -> usize {
        self.config.players
    }

    /// Whether the arrays are file backed.
    pub fn is_mapped(&self) -> bool {
        self.workspace.is_mapped()
    }

    /// Every dealt card, three per hand.
    pub fn hands(&self) -> &[Card] {
        &self.cards
    }

    /// Cards of one hand. Seat 0 is the dealer, seats 1..=players the players.
    pub fn hand(&self, round: usize, seat: usize) -> &[Card] {
        let start = (round * (self.players() + 1) + seat) * HAND_SIZE;
        &self.cards[start..start + HAND_SIZE]
    }

    /// Every hand value.
    pub fn hand_values(&self) -> &[i32] {
        &self.values
    }

    /// Dealer hand value of each round.
    pub fn dealer_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().step_by(self.players() + 1).copied()
    }

    /// Values of the player hands only.
    pub fn player_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.values
            .chunks_exact(self.players() + 1)
            .flat_map(|round| round[1..].iter().copied())
    }

    /// Dealer hand value in `round`.
    pub fn dealer_value(&self, round: usize) -> i32 {
        self.values[round * (self.players() + 1)]
    }

    /// Hand value of `player` (0-based) in `round`.
    pub fn player_value(&self, round: usize, player: usize) -> i32 {
        self.values[round * (self.players() + 1) + player + 1]
    }

    /// Wager multipliers.
    pub fn multipliers(&self) -> &[i32] {
        &self.multipliers
    }

    /// Payouts in dollars before bank clipping, player perspective.
    pub fn payouts(&self) -> &[i64] {
        &self.payouts
    }

    /// Settled payouts in dollars, player perspective.
    pub fn settled(&self) -> &[i64] {
        &self.settled
    }

    fn spot_index(&self, round: usize, player: usize, spot: Spot) -> usize {
        (round * self.players() + player) * SPOTS + spot.index()
    }

    /// Multiplier of one spot.
    pub fn multiplier(&self, round: usize, player: usize, spot: Spot) -> i32 {
        self.multipliers[self.spot_index(round, player, spot)]
    }

    /// Settled payout of one spot.
    pub fn settled_spot(&self, round: usize, player: usize, spot: Spot) -> i64 {
        self.settled[self.spot_index(round, player, spot)]
    }

    /// Settled payout summed over each round, player perspective.
    pub fn round_totals(&self) -> Vec<i64> {
        Self::per_round(&self.settled, self.players())
    }

    /// Unclipped payout summed over each round, player perspective.
    pub fn unclipped_round_totals(&self) -> Vec<i64> {
        Self::per_round(&self.payouts, self.players())
    }

    fn per_round(values: &[i64], players: usize) -> Vec<i64> {
        values.par_chunks(players * SPOTS).map(|round| round.iter().sum::<i64>()).collect()
    }
}
