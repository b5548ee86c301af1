//! Label formatting: image index → badge text.
//!
//! Pure functions only; both backends call [`format_label`] through
//! [`crate::config::RenderConfig::resolve_label`].

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letters available in the Latin alphabets (a–z).
const LATIN_LETTERS: usize = 26;
/// Letters available in the Cyrillic alphabets starting at 'а' / 'А'.
const CYRILLIC_LETTERS: usize = 32;

/// Ordinal scheme used for automatic labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// a, b, c, …
    LatinLower,
    /// A, B, C, …
    LatinUpper,
    /// а, б, в, …
    CyrillicLower,
    /// А, Б, В, …
    CyrillicUpper,
    /// 1, 2, 3, …
    Arabic,
    /// I, II, III, …
    Roman,
}

impl LabelMode {
    pub const ALL: [LabelMode; 6] = [
        LabelMode::LatinLower,
        LabelMode::LatinUpper,
        LabelMode::CyrillicLower,
        LabelMode::CyrillicUpper,
        LabelMode::Arabic,
        LabelMode::Roman,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LabelMode::LatinLower => "latin_lower",
            LabelMode::LatinUpper => "latin_upper",
            LabelMode::CyrillicLower => "cyrillic_lower",
            LabelMode::CyrillicUpper => "cyrillic_upper",
            LabelMode::Arabic => "arabic",
            LabelMode::Roman => "roman",
        }
    }

    /// Comma-separated list of every mode name, for error messages.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelMode {
    type Err = ComposeError;

    /// Accepts `latin_lower` and `latin-lower` spellings, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| ComposeError::InvalidMode {
                value: s.to_string(),
                expected: Self::expected(),
            })
    }
}

/// Format the label for the image at `index` (0-based).
///
/// Latin modes cover indices 0–25 and Cyrillic modes 0–31; past that the
/// call fails with [`ComposeError::LabelOutOfRange`].
pub fn format_label(index: usize, mode: LabelMode) -> Result<String> {
    match mode {
        LabelMode::LatinLower => offset_char('a', index, LATIN_LETTERS, mode),
        LabelMode::LatinUpper => offset_char('A', index, LATIN_LETTERS, mode),
        LabelMode::CyrillicLower => offset_char('а', index, CYRILLIC_LETTERS, mode),
        LabelMode::CyrillicUpper => offset_char('А', index, CYRILLIC_LETTERS, mode),
        LabelMode::Arabic => Ok((index + 1).to_string()),
        LabelMode::Roman => Ok(to_roman(index + 1)),
    }
}

fn offset_char(base: char, index: usize, letters: usize, mode: LabelMode) -> Result<String> {
    let out_of_range = || ComposeError::LabelOutOfRange {
        index,
        mode: mode.as_str(),
        limit: letters - 1,
    };
    if index >= letters {
        return Err(out_of_range());
    }
    char::from_u32(base as u32 + index as u32)
        .map(String::from)
        .ok_or_else(out_of_range)
}

/// Greedy subtractive Roman numeral for `n` (1 → "I"). `0` yields "".
pub fn to_roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for &(value, symbol) in &TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}
