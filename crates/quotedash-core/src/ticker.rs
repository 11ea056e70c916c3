use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker must not be empty")]
    Empty,

    #[error("ticker {0:?} contains characters other than letters, digits, '.', '-', '^' or '='")]
    InvalidCharacters(String),
}

/// Upper-cased exchange symbol, e.g., `AAPL`, `BRK-B`, `^GSPC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(raw: &str) -> Result<Self, TickerError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=');
        if !symbol.chars().all(allowed) {
            return Err(TickerError::InvalidCharacters(symbol));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        let ticker = Ticker::new("  brk-b ").unwrap();
        assert_eq!(ticker.as_str(), "BRK-B");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Ticker::new("   "), Err(TickerError::Empty));
    }

    #[test]
    fn rejects_markup() {
        assert!(matches!(
            Ticker::new("<script>"),
            Err(TickerError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn accepts_index_symbols() {
        assert_eq!(Ticker::new("^gspc").unwrap().to_string(), "^GSPC");
    }
}
