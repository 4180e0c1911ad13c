//! # Three Card Poker Banking
//!
//! A Monte Carlo simulator for Three Card Poker where one player acts as the
//! bank, covering every other seat's wagers up to a fixed amount of capital
//! per round.
//!
//! ## Features
//!
//! - **Perfect-hash evaluation**: every 3-card hand maps to a single integer
//!   strength (741 in all) through a table of rank-prime products
//! - **Parallel batches**: dealing, evaluation, wager resolution and
//!   settlement all run over rounds with rayon
//! - **Bankroll clipping**: payouts beyond the bank amount are cut in a fixed
//!   settlement order
//! - **Large runs**: working arrays can spill to memory-mapped files
//!
//! ## Quick Start
//!
//! ```no_run
//! use tcp_bank::{SimulationConfig, SimulationReport, Simulator};
//!
//! let config = SimulationConfig::default().with_rounds(100_000).with_bank(5_000);
//! let run = Simulator::new(config)?.run()?;
//! let report = SimulationReport::from_run(&run);
//! println!("banker profit per round: {:.2}", report.profit_per_round);
//! # Ok::<(), tcp_bank::SimulationError>(())
//! ```
//!
//! ## Modules
//!
//! - [`poker`]: cards, the rank table, hand evaluation and dealing
//! - [`bank`]: wagers, settlement, the simulation driver and reporting
//!
//! ## Architecture
//!
//! ```text
//!   HandDealer ──► HandEvaluator ──► WagerEngine ──► stakes ──► BankrollSettlement
//!   (cards)        (values)          (multipliers)   (payouts)  (settled)
//!                       ▲                 ▲
//!                   RankTable       FiveCardOracle
//! ```

#![warn(missing_docs)]

/// Bank-side wagers, settlement and simulation.
pub mod bank;

/// Error types shared across the crate.
pub mod error;

/// Card encoding, hand ranking and dealing.
pub mod poker;

pub use bank::{SimulationConfig, SimulationReport, SimulationRun, Simulator};
pub use error::SimulationError;
pub use poker::{Card, HandEvaluator, RankTable};
