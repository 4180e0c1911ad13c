//! Three Card Poker player-banking simulator.
//!
//! Usage: simulate --rounds 100000 --players 5 --bank 5000 --stake 20
//!
//! Options given on the command line override the JSON config file. The
//! merged configuration is validated once, when the simulator is built.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use tcp_bank::bank::{SimulationConfig, SimulationReport, Simulator, Stage, Stakes, StorageMode};

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Simulate Three Card Poker with a player acting as the bank")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Player seats, not counting the banker
    #[arg(short, long)]
    players: Option<usize>,

    /// Capital the banker risks per round
    #[arg(short, long)]
    bank: Option<i64>,

    /// Stake on every spot (Play, Ante, Pair-Plus, 6-card)
    #[arg(long)]
    stake: Option<i64>,

    /// Random seed for dealing
    #[arg(long)]
    seed: Option<u64>,

    /// Where the working arrays live
    #[arg(long, value_enum)]
    storage: Option<StorageArg>,

    /// Directory for memory-mapped arrays
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write the report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StorageArg {
    Memory,
    Mapped,
    Auto,
}

impl From<StorageArg> for StorageMode {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Memory => StorageMode::Memory,
            StorageArg::Mapped => StorageMode::Mapped,
            StorageArg::Auto => StorageMode::Auto,
        }
    }
}

impl Args {
    fn into_config(self) -> Result<(SimulationConfig, Option<PathBuf>), String> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::parse_json_file(path)
                .map_err(|e| format!("could not load {}: {}", path.display(), e))?,
            None => SimulationConfig::default(),
        };

        if let Some(rounds) = self.rounds {
            config = config.with_rounds(rounds);
        }
        if let Some(players) = self.players {
            config = config.with_players(players);
        }
        if let Some(bank) = self.bank {
            config = config.with_bank(bank);
        }
        if let Some(stake) = self.stake {
            config = config.with_stakes(Stakes::uniform(stake));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(mode) = self.storage {
            config.storage.mode = mode.into();
        }
        if let Some(dir) = self.data_dir {
            config.storage.data_dir = Some(dir);
        }

        Ok((config, self.report))
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (config, report_path) = match Args::parse().into_config() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Three Card Poker - Player Banking Simulator ===");
    println!(
        "Dealing {} rounds, each with {} players and one player/dealer ({} hands)\n",
        config.rounds,
        config.players,
        config.total_hands()
    );

    let simulator = match Simulator::new(config) {
        Ok(simulator) => simulator,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let progress = ProgressBar::new(Stage::ALL.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:30} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(Stage::ALL[0].name());

    let start = Instant::now();
    let result = simulator.run_with_callback(|stage, _| {
        progress.inc(1);
        if let Some(next) = Stage::ALL.iter().skip_while(|&&s| s != stage).nth(1) {
            progress.set_message(next.name());
        }
    });
    progress.finish_and_clear();

    let run = match result {
        Ok(run) => run,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Simulated in {:.2}s\n", start.elapsed().as_secs_f64());

    let report = SimulationReport::from_run(&run);
    print!("{}", report);

    if let Some(path) = report_path {
        match report.save_json(&path) {
            Ok(()) => println!("\nReport written to {}", path.display()),
            Err(e) => {
                eprintln!("could not write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
