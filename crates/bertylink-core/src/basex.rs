//! Alphabet-parameterized base-N text encoding
//!
//! Bytes are treated as one big-endian unsigned integer and rewritten in the
//! base defined by the alphabet length. Every leading zero byte is emitted as
//! the alphabet's first symbol, so `decode(encode(b)) == b` holds for any
//! input, including empty and all-zero byte strings. This is the same scheme
//! `bs58` uses, applied to an arbitrary alphabet.
//!
//! The web form uses `bs58` directly. [`BASE43`] covers the internal form,
//! whose alphabet stays in the QR alphanumeric mode.

use std::fmt;

use thiserror::Error;

/// Sentinel marking a byte that is not part of the alphabet.
const INVALID: u8 = 0xFF;

/// QR alphanumeric mode characters, minus space, `%` and `+`.
///
/// The QR standard defines 45 alphanumeric symbols (`0-9`, `A-Z`, space and
/// `$ % * + - . / :`). Space, `%` and `+` are altered by URL percent-encoding,
/// which leaves 42 symbols. Links in the wild were produced with exactly this
/// ordering, so it must not change.
pub static BASE43: Alphabet = Alphabet::must("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$*-.:/");

/// Errors raised when building an [`Alphabet`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetError {
    /// Fewer than two symbols, or more than 255
    #[error("Alphabet must have between 2 and 255 symbols, got {0}")]
    InvalidLength(usize),

    /// Only single-byte symbols are supported
    #[error("Alphabet symbol at index {0} is not ASCII")]
    NonAscii(usize),

    /// A symbol appears twice
    #[error("Alphabet symbol {0:?} appears more than once")]
    Duplicate(char),
}

/// Errors raised when decoding a base43 or base58 blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contains a character outside the alphabet
    #[error("Invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    /// The web blob is not valid base58
    #[error("Invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
}

/// An ordered, duplicate-free set of ASCII symbols defining a base.
///
/// Built at compile time; the symbol table and its reverse lookup are
/// read-only and can be shared freely between threads.
#[derive(Clone, Copy)]
pub struct Alphabet {
    symbols: &'static [u8],
    lookup: [u8; 256],
}

impl Alphabet {
    /// Build an alphabet from its symbols, in digit order.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError`] if the alphabet has fewer than 2 or more
    /// than 255 symbols, contains a non-ASCII byte, or repeats a symbol.
    pub const fn new(symbols: &'static str) -> Result<Self, AlphabetError> {
        let symbols = symbols.as_bytes();
        if symbols.len() < 2 || symbols.len() > 255 {
            return Err(AlphabetError::InvalidLength(symbols.len()));
        }

        let mut lookup = [INVALID; 256];
        let mut i = 0;
        while i < symbols.len() {
            let symbol = symbols[i];
            if !symbol.is_ascii() {
                return Err(AlphabetError::NonAscii(i));
            }
            if lookup[symbol as usize] != INVALID {
                return Err(AlphabetError::Duplicate(symbol as char));
            }
            lookup[symbol as usize] = i as u8;
            i += 1;
        }

        Ok(Self { symbols, lookup })
    }

    /// Const constructor for the built-in alphabets; a bad table fails the build.
    const fn must(symbols: &'static str) -> Self {
        match Self::new(symbols) {
            Ok(alphabet) => alphabet,
            Err(_) => panic!("invalid built-in alphabet"),
        }
    }

    /// Number of symbols, i.e. the numeric base.
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// The symbols in digit order.
    pub fn symbols(&self) -> &'static str {
        // Only ASCII bytes pass `new`, so this never falls back.
        std::str::from_utf8(self.symbols).unwrap_or_default()
    }

    /// Encode bytes as text in this alphabet.
    pub fn encode(&self, input: &[u8]) -> String {
        let base = self.base() as u32;
        let zeros = input.iter().take_while(|&&b| b == 0).count();

        // Little-endian digits in `base`.
        let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 2);
        for &byte in &input[zeros..] {
            let mut carry = u32::from(byte);
            for digit in digits.iter_mut() {
                carry += u32::from(*digit) << 8;
                *digit = (carry % base) as u8;
                carry /= base;
            }
            while carry > 0 {
                digits.push((carry % base) as u8);
                carry /= base;
            }
        }

        let zero = self.symbols[0] as char;
        let mut out = String::with_capacity(zeros + digits.len());
        for _ in 0..zeros {
            out.push(zero);
        }
        out.extend(digits.iter().rev().map(|&d| self.symbols[d as usize] as char));
        out
    }

    /// Decode text produced by [`Alphabet::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidCharacter`] for any character that is
    /// not in the alphabet.
    pub fn decode(&self, input: &str) -> Result<Vec<u8>, DecodeError> {
        let base = self.base() as u32;
        let zero = self.symbols[0];
        let zeros = input.bytes().take_while(|&b| b == zero).count();

        // Little-endian bytes.
        let mut bytes: Vec<u8> = Vec::with_capacity(input.len());
        for (index, character) in input.char_indices().skip(zeros) {
            let value = self.value_of(character).ok_or(DecodeError::InvalidCharacter {
                character,
                index,
            })?;

            let mut carry = u32::from(value);
            for byte in bytes.iter_mut() {
                carry += u32::from(*byte) * base;
                *byte = (carry & 0xFF) as u8;
                carry >>= 8;
            }
            while carry > 0 {
                bytes.push((carry & 0xFF) as u8);
                carry >>= 8;
            }
        }

        bytes.resize(bytes.len() + zeros, 0);
        bytes.reverse();
        Ok(bytes)
    }

    fn value_of(&self, character: char) -> Option<u8> {
        if !character.is_ascii() {
            return None;
        }
        match self.lookup[character as usize] {
            INVALID => None,
            value => Some(value),
        }
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("base", &self.base())
            .field("symbols", &self.symbols())
            .finish()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}
