//! Three Card Poker hands: encoding, ranking, dealing and evaluation.
//!
//! # Overview
//!
//! - [`card`]: packed card encoding (rank prime + suit bit) and the deck
//! - [`rank_table`]: the 455-key perfect hash from rank triple to strength
//! - [`evaluator`]: batch evaluation of 3-card hands against the table
//! - [`dealer`]: seeded, parallel dealing of many rounds at once
//! - [`five_card`]: best-5-of-6 strength for the 6-card bonus
//!
//! Lower values are always stronger, in both the 3-card and 5-card scales.

pub mod card;
pub mod dealer;
pub mod evaluator;
pub mod five_card;
pub mod rank_table;

pub use card::{parse_cards, Card, Deck};
pub use dealer::HandDealer;
pub use evaluator::HandEvaluator;
pub use five_card::{FiveCardBands, FiveCardOracle, LookupEvaluator};
pub use rank_table::{HandClass, RankTable, FLUSH_OFFSET};
