//! Tri-state logic levels and the wave symbol alphabet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wave symbols that carry a data payload, in color order.
///
/// The position of a symbol in this table is the color index of the
/// samples it encodes.
pub const DATA_SYMBOLS: [char; 8] = ['2', '3', '4', '5', '6', '7', '8', '9'];

/// Wave symbol for an unknown sample.
pub const UNKNOWN_SYMBOL: char = 'x';

/// Wave symbol for a don't-care sample.
pub const DONT_CARE_SYMBOL: char = '-';

/// The classification of a single sample.
///
/// - `Logic`: the sample asserts its value
/// - `Unknown`: the value is unspecified and ignored by comparisons
/// - `DontCare`: the value is explicitly left unchecked
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogicLevel {
    /// Asserted value.
    Logic = 0,
    /// Unspecified value.
    Unknown = 1,
    /// Explicitly unchecked value.
    DontCare = 2,
}

impl LogicLevel {
    /// Returns `true` if a sample at this level asserts a concrete value.
    pub fn is_asserted(self) -> bool {
        self == LogicLevel::Logic
    }

    /// Returns the wave symbol of a non-asserting level, or `None` for `Logic`.
    pub fn symbol(self) -> Option<char> {
        match self {
            LogicLevel::Logic => None,
            LogicLevel::Unknown => Some(UNKNOWN_SYMBOL),
            LogicLevel::DontCare => Some(DONT_CARE_SYMBOL),
        }
    }
}

impl fmt::Display for LogicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicLevel::Logic => write!(f, "logic"),
            LogicLevel::Unknown => write!(f, "unknown"),
            LogicLevel::DontCare => write!(f, "don't care"),
        }
    }
}

/// What a single literal wave character stands for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WaveSymbol {
    /// `0` or `1`.
    Binary(u8),
    /// A data lane symbol with its color index.
    Data(u8),
    /// `x`.
    Unknown,
    /// `-`.
    DontCare,
}

impl WaveSymbol {
    /// Classifies a literal wave character.
    ///
    /// Accepts `0`, `1`, the data symbols `2`..`9`, `x`/`X` and `-`.
    /// The continuation marker `.` is not a literal and yields `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(WaveSymbol::Binary(0)),
            '1' => Some(WaveSymbol::Binary(1)),
            'x' | 'X' => Some(WaveSymbol::Unknown),
            '-' => Some(WaveSymbol::DontCare),
            _ => DATA_SYMBOLS
                .iter()
                .position(|&s| s == c)
                .map(|i| WaveSymbol::Data(i as u8)),
        }
    }

    /// Returns the wave character for this symbol.
    pub fn to_char(self) -> char {
        match self {
            WaveSymbol::Binary(0) => '0',
            WaveSymbol::Binary(_) => '1',
            WaveSymbol::Data(color) => data_symbol(color),
            WaveSymbol::Unknown => UNKNOWN_SYMBOL,
            WaveSymbol::DontCare => DONT_CARE_SYMBOL,
        }
    }

    /// Returns the logic level a sample encoded with this symbol carries.
    pub fn level(self) -> LogicLevel {
        match self {
            WaveSymbol::Binary(_) | WaveSymbol::Data(_) => LogicLevel::Logic,
            WaveSymbol::Unknown => LogicLevel::Unknown,
            WaveSymbol::DontCare => LogicLevel::DontCare,
        }
    }

    /// Returns `true` if this symbol consumes an entry of the data list.
    pub fn is_data(self) -> bool {
        matches!(self, WaveSymbol::Data(_))
    }
}

/// Returns the data symbol for a color index, wrapping around the alphabet.
pub fn data_symbol(color: u8) -> char {
    DATA_SYMBOLS[color as usize % DATA_SYMBOLS.len()]
}

/// Returns `true` if `c` is one of the data lane symbols.
pub fn is_data_symbol(c: char) -> bool {
    DATA_SYMBOLS.contains(&c)
}
