//! Player banking: wagers, bankroll settlement and the simulation around them.
//!
//! # Overview
//!
//! - [`config`]: run parameters, loaded from JSON or built in code
//! - [`storage`]: heap or memory-mapped working arrays
//! - [`wager`]: house-way decisions and per-spot multipliers
//! - [`settlement`]: clipping each round's payouts to the bank amount
//! - [`simulation`]: the deal, evaluate, resolve, stake and settle pipeline
//! - [`report`]: banker-side totals, hand frequencies and rolling returns
//!
//! # Example
//! ```no_run
//! use tcp_bank::bank::{SimulationConfig, SimulationReport, Simulator};
//!
//! let config = SimulationConfig::default().with_rounds(10_000).with_seed(1);
//! let run = Simulator::new(config)?.run()?;
//! println!("{}", SimulationReport::from_run(&run));
//! # Ok::<(), tcp_bank::SimulationError>(())
//! ```

pub mod config;
pub mod report;
pub mod settlement;
pub mod simulation;
pub mod storage;
pub mod wager;

pub use config::{ConfigError, SimulationConfig, Stakes, StorageConfig, StorageMode};
pub use report::SimulationReport;
pub use settlement::BankrollSettlement;
pub use simulation::{SimulationRun, Simulator, Stage};
pub use storage::{Buffer, Workspace};
pub use wager::{HouseWay, Spot, WagerEngine, WagerOutcome};
