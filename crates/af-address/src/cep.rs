use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

const PARTIAL_CEP_PATTERN: &str = r"^\d{5}$";
static PARTIAL_CEP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PARTIAL_CEP_PATTERN).expect("Invalid regex pattern"));

/// Number of digits in a CEP.
pub const CEP_DIGITS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CepError {
    #[error("a CEP has 8 digits, got {0}")]
    InvalidLength(usize),
}

/// A Brazilian postal code, stored as its 8 digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cep {
    digits: String,
}

impl Cep {
    /// Parse user input. Every non-digit is discarded, so `01234-567`,
    /// `01234567` and ` 01.234-567 ` all yield the same code.
    pub fn parse(raw: &str) -> Result<Self, CepError> {
        let digits: String = raw.trim().chars().filter(char::is_ascii_digit).collect();
        if digits.len() != CEP_DIGITS {
            return Err(CepError::InvalidLength(digits.len()));
        }
        Ok(Self { digits })
    }

    /// The bare digits, as sent to the lookup service.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", &self.digits[..5], &self.digits[5..])
    }
}

/// Insert the separator once the first five digits have been typed.
pub fn autoformat(value: &str) -> Option<String> {
    let value = value.trim();
    PARTIAL_CEP_REGEX
        .is_match(value)
        .then(|| format!("{value}-"))
}
