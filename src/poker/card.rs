//! Card representation for Three Card Poker.
//!
//! Cards are packed into a single `u32` so the evaluators can read the rank
//! prime and the suit bit with a mask, without any decoding:
//!
//! ```text
//! xxxbbbbb bbbbbbbb cdhsrrrr xxpppppp
//! ```
//!
//! - `p`: prime for the rank (2 = 2, 3 = 3, ..., A = 41)
//! - `r`: rank index (0-12: 2-A)
//! - `cdhs`: one bit for the suit
//! - `b`: one-hot bit for the rank

use std::fmt;

/// Rank of a card (0-12: 2-A).
pub const RANK_2: u8 = 0;
pub const RANK_3: u8 = 1;
pub const RANK_4: u8 = 2;
pub const RANK_5: u8 = 3;
pub const RANK_6: u8 = 4;
pub const RANK_7: u8 = 5;
pub const RANK_8: u8 = 6;
pub const RANK_9: u8 = 7;
pub const RANK_T: u8 = 8;
pub const RANK_J: u8 = 9;
pub const RANK_Q: u8 = 10;
pub const RANK_K: u8 = 11;
pub const RANK_A: u8 = 12;

/// Suit of a card (0-3).
pub const SUIT_CLUBS: u8 = 0;
pub const SUIT_DIAMONDS: u8 = 1;
pub const SUIT_HEARTS: u8 = 2;
pub const SUIT_SPADES: u8 = 3;

/// One prime per rank, 2 through A.
pub const RANK_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Suit bit per suit index (clubs, diamonds, hearts, spades).
const SUIT_BITS: [u32; 4] = [0x8000, 0x4000, 0x2000, 0x1000];

/// Mask selecting the rank prime.
pub const PRIME_MASK: u32 = 0xFF;

/// Mask selecting the suit nibble.
pub const SUIT_MASK: u32 = 0xF000;

const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// A single playing card in packed form.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Card(u32);

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        let bit = 1u32 << (16 + rank as u32);
        Self(bit | SUIT_BITS[suit as usize] | (rank as u32) << 8 | RANK_PRIMES[rank as usize])
    }

    /// Wrap an already packed value. No validation is done; a corrupt value
    /// is caught later by the evaluators.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Parse a card from string like "As", "Kh", "2c".
    pub fn from_str(s: &str) -> Option<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return None;
        }

        let rank = RANK_CHARS.iter().position(|&c| c == chars[0].to_ascii_uppercase())?;
        let suit = SUIT_CHARS.iter().position(|&c| c == chars[1].to_ascii_lowercase())?;

        Some(Self::new(rank as u8, suit as u8))
    }

    /// The packed value.
    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Rank prime (low byte).
    #[inline]
    pub fn prime(&self) -> u32 {
        self.0 & PRIME_MASK
    }

    /// Suit bit (high nibble of the low half-word).
    #[inline]
    pub fn suit_bits(&self) -> u32 {
        self.0 & SUIT_MASK
    }

    /// Rank index (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// Suit index (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        match self.suit_bits() {
            0x8000 => SUIT_CLUBS,
            0x4000 => SUIT_DIAMONDS,
            0x2000 => SUIT_HEARTS,
            _ => SUIT_SPADES,
        }
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS.get(self.rank() as usize).copied().unwrap_or('?')
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Parse whitespace-separated or packed cards like "Ac 2d 4d" or "Ac2d4d".
pub fn parse_cards(s: &str) -> Option<Vec<Card>> {
    let s = s.replace(' ', "");
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| Card::from_str(s.get(i..i + 2)?))
        .collect()
}

/// The 52-card deck.
#[derive(Clone)]
pub struct Deck {
    cards: [Card; 52],
}

impl Deck {
    /// Create a full deck in standard order (rank-major).
    pub fn full() -> Self {
        let mut cards = [Card::default(); 52];
        for rank in 0..13u8 {
            for suit in 0..4u8 {
                cards[(rank * 4 + suit) as usize] = Card::new(rank, suit);
            }
        }
        Self { cards }
    }

    /// All 52 cards.
    pub fn cards(&self) -> &[Card; 52] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} cards)", self.cards.len())
    }
}
