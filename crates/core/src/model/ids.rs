use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zero-based position of an answer choice within a question's option list.
///
/// Selections are stored as indices throughout the domain; mapping an index
/// to a display letter happens at the presentation boundary only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Creates a new `OptionIndex`
    #[must_use]
    pub fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the underlying u8 value
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the index widened for slice indexing.
    #[must_use]
    pub fn as_usize(&self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing an `OptionIndex` from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionIndexError;

impl fmt::Display for ParseOptionIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse OptionIndex from string")
    }
}

impl std::error::Error for ParseOptionIndexError {}

impl FromStr for OptionIndex {
    type Err = ParseOptionIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map(OptionIndex::new)
            .map_err(|_| ParseOptionIndexError)
    }
}
