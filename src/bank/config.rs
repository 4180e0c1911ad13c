//! Configuration for a banking simulation.
//!
//! Configs can be built in code with the `with_*` builder methods or loaded
//! from JSON. Either way they are validated before a run allocates anything.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::wager::{MAX_MULTIPLIER, SPOTS};

/// Stake per betting spot, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakes {
    /// Play wager, placed only when the player plays.
    pub play: i64,
    /// Ante wager.
    pub ante: i64,
    /// Pair-Plus side bet.
    pub pair_plus: i64,
    /// 6-card bonus side bet.
    pub six_card: i64,
}

impl Stakes {
    /// The same stake on every spot.
    pub fn uniform(amount: i64) -> Self {
        Self {
            play: amount,
            ante: amount,
            pair_plus: amount,
            six_card: amount,
        }
    }

    /// Stakes in settlement order (Play, Ante, Pair-Plus, 6-card).
    pub fn as_array(&self) -> [i64; 4] {
        [self.play, self.ante, self.pair_plus, self.six_card]
    }
}

impl Default for Stakes {
    fn default() -> Self {
        Self::uniform(20)
    }
}

/// Where the large working arrays live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Always on the heap.
    Memory,
    /// Always memory-mapped files.
    Mapped,
    /// Memory-mapped once the batch reaches `mapped_threshold_hands`.
    Auto,
}

/// Working storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Heap, mapped, or chosen by size.
    pub mode: StorageMode,

    /// Directory for mapped files. A fresh temporary directory is used when
    /// unset.
    pub data_dir: Option<PathBuf>,

    /// Hand count at which `Auto` switches to mapped files.
    pub mapped_threshold_hands: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Auto,
            data_dir: None,
            mapped_threshold_hands: 1_000_000,
        }
    }
}

impl StorageConfig {
    /// Whether a batch of `hands` hands should be mapped.
    pub fn should_map(&self, hands: usize) -> bool {
        match self.mode {
            StorageMode::Memory => false,
            StorageMode::Mapped => true,
            StorageMode::Auto => hands >= self.mapped_threshold_hands,
        }
    }
}

/// Configuration for a simulation run.
///
/// # Example
/// ```
/// use tcp_bank::bank::SimulationConfig;
///
/// let config = SimulationConfig::default().with_rounds(1_000).with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rounds to simulate.
    pub rounds: usize,

    /// Player seats per round, not counting the banker.
    pub players: usize,

    /// Stake on each spot.
    pub stakes: Stakes,

    /// Capital the banker risks per round.
    pub bank_amount: i64,

    /// Random seed for dealing. If `None`, a random seed is drawn and logged.
    pub seed: Option<u64>,

    /// Working storage settings.
    pub storage: StorageConfig,

    /// Window sizes (in rounds) for rolling return distributions.
    pub rolling_windows: Vec<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 100_000,
            players: 5,
            stakes: Stakes::default(),
            bank_amount: 5000,
            seed: None,
            storage: StorageConfig::default(),
            rolling_windows: vec![100, 1000],
        }
    }
}

/// Most seats a 52-card deck can serve with 3-card hands plus the dealer.
pub const MAX_PLAYERS: usize = 52 / 3 - 1;

/// Largest stake whose best-case payout, summed over every spot of a full
/// table, still fits in an `i64`.
pub const MAX_STAKE: i64 = i64::MAX / (MAX_MULTIPLIER * SPOTS as i64 * MAX_PLAYERS as i64);

impl SimulationConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::parse_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string. Missing fields
    /// take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_json_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file without validating, for callers that override
    /// fields before running.
    pub fn parse_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse_json_str(&content)
    }

    /// Parse a JSON string without validating.
    pub fn parse_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Builder method: set number of rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Builder method: set number of player seats.
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Builder method: set stakes.
    pub fn with_stakes(mut self, stakes: Stakes) -> Self {
        self.stakes = stakes;
        self
    }

    /// Builder method: set bank capital.
    pub fn with_bank(mut self, bank_amount: i64) -> Self {
        self.bank_amount = bank_amount;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set storage settings.
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Builder method: set rolling windows.
    pub fn with_rolling_windows(mut self, windows: Vec<usize>) -> Self {
        self.rolling_windows = windows;
        self
    }

    /// Total hands in the batch, dealer hands included.
    pub fn total_hands(&self) -> usize {
        self.rounds * (self.players + 1)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }

        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(ConfigError::InvalidPlayerCount(self.players));
        }

        let s = &self.stakes;
        if s.ante <= 0 || s.pair_plus < 0 || s.six_card < 0 {
            return Err(ConfigError::InvalidStake(*s));
        }
        if let Some(&stake) = s.as_array().iter().find(|&&x| x > MAX_STAKE) {
            return Err(ConfigError::StakeTooLarge(stake));
        }
        if s.play != s.ante {
            return Err(ConfigError::PlayNotEqualAnte { play: s.play, ante: s.ante });
        }
        if s.pair_plus > s.ante {
            return Err(ConfigError::PairPlusAboveAnte {
                pair_plus: s.pair_plus,
                ante: s.ante,
            });
        }

        if self.bank_amount <= 0 {
            return Err(ConfigError::NonPositiveBank(self.bank_amount));
        }

        if self.rolling_windows.contains(&0) {
            return Err(ConfigError::ZeroWindow);
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(String),
    /// The config file is not valid JSON for this schema.
    #[error("Parse error: {0}")]
    Parse(String),
    /// `rounds` is zero.
    #[error("at least one round is required")]
    NoRounds,
    /// Too few or too many seats for one deck.
    #[error("invalid player count: {0} (must be 1-{max})", max = MAX_PLAYERS)]
    InvalidPlayerCount(usize),
    /// Non-positive ante or negative bonus stake.
    #[error("invalid stakes {0:?}: ante must be positive and bonus stakes non-negative")]
    InvalidStake(Stakes),
    /// Play and Ante stakes differ.
    #[error("play stake {play} must equal ante stake {ante}")]
    PlayNotEqualAnte {
        /// Play stake.
        play: i64,
        /// Ante stake.
        ante: i64,
    },
    /// Pair-Plus stake exceeds the Ante.
    #[error("pair-plus stake {pair_plus} cannot exceed ante stake {ante}")]
    PairPlusAboveAnte {
        /// Pair-Plus stake.
        pair_plus: i64,
        /// Ante stake.
        ante: i64,
    },
    /// A stake above [`MAX_STAKE`].
    #[error("stake {0} is too large: payouts would overflow (max {max})", max = MAX_STAKE)]
    StakeTooLarge(i64),
    /// `bank_amount` is zero or negative.
    #[error("bank amount {0} must be positive")]
    NonPositiveBank(i64),
    /// A rolling window of zero rounds.
    #[error("rolling window size must be positive")]
    ZeroWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: &str = r#"{
        "rounds": 2000,
        "players": 4,
        "stakes": { "play": 25, "ante": 25, "pair_plus": 10, "six_card": 5 },
        "bank_amount": 10000,
        "seed": 99,
        "storage": { "mode": "mapped", "mapped_threshold_hands": 0 }
    }"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_hands(), 600_000);
    }

    #[test]
    fn test_parse_json() {
        let config = SimulationConfig::from_json_str(TEST_CONFIG).unwrap();
        assert_eq!(config.rounds, 2000);
        assert_eq!(config.players, 4);
        assert_eq!(config.stakes.as_array(), [25, 25, 10, 5]);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.storage.mode, StorageMode::Mapped);
        assert!(config.storage.data_dir.is_none());
        // Omitted fields fall back to defaults
        assert_eq!(config.rolling_windows, vec![100, 1000]);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/default.json");
        let config = SimulationConfig::from_json_file(path).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_parse_defers_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, r#"{ "players": 20 }"#).unwrap();

        assert_eq!(
            SimulationConfig::from_json_file(&path),
            Err(ConfigError::InvalidPlayerCount(20))
        );

        // An override can repair what the file got wrong
        let config = SimulationConfig::parse_json_file(&path).unwrap();
        assert_eq!(config.players, 20);
        assert!(config.with_players(4).validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_player_count_limits() {
        assert!(SimulationConfig::default().with_players(16).validate().is_ok());
        assert_eq!(
            SimulationConfig::default().with_players(17).validate(),
            Err(ConfigError::InvalidPlayerCount(17))
        );
        assert_eq!(
            SimulationConfig::default().with_players(0).validate(),
            Err(ConfigError::InvalidPlayerCount(0))
        );
    }

    #[test]
    fn test_stake_relationships() {
        let mut stakes = Stakes::uniform(20);
        stakes.play = 10;
        assert!(matches!(
            SimulationConfig::default().with_stakes(stakes).validate(),
            Err(ConfigError::PlayNotEqualAnte { .. })
        ));

        let mut stakes = Stakes::uniform(20);
        stakes.pair_plus = 30;
        assert!(matches!(
            SimulationConfig::default().with_stakes(stakes).validate(),
            Err(ConfigError::PairPlusAboveAnte { .. })
        ));

        let mut stakes = Stakes::uniform(20);
        stakes.six_card = -1;
        assert!(matches!(
            SimulationConfig::default().with_stakes(stakes).validate(),
            Err(ConfigError::InvalidStake(_))
        ));
    }

    #[test]
    fn test_oversized_stake_rejected() {
        let huge = Stakes::uniform(i64::MAX / 100);
        assert_eq!(
            SimulationConfig::default().with_stakes(huge).validate(),
            Err(ConfigError::StakeTooLarge(i64::MAX / 100))
        );

        // The bound itself is accepted, and its largest payout fits
        let top = SimulationConfig::default().with_stakes(Stakes::uniform(MAX_STAKE));
        assert!(top.validate().is_ok());
        assert!(MAX_STAKE.checked_mul(MAX_MULTIPLIER).is_some());
    }

    #[test]
    fn test_bank_and_rounds() {
        assert_eq!(
            SimulationConfig::default().with_bank(0).validate(),
            Err(ConfigError::NonPositiveBank(0))
        );
        assert_eq!(
            SimulationConfig::default().with_rounds(0).validate(),
            Err(ConfigError::NoRounds)
        );
        assert_eq!(
            SimulationConfig::default().with_rolling_windows(vec![10, 0]).validate(),
            Err(ConfigError::ZeroWindow)
        );
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "players": 20 }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPlayerCount(20));

        let err = SimulationConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_storage_mode() {
        let storage = StorageConfig::default();
        assert!(!storage.should_map(999_999));
        assert!(storage.should_map(1_000_000));
    }
}
