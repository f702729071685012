use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a product.
///
/// Serializes as a bare JSON integer. Zero never names a stored product;
/// in an update payload it means "no id supplied".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// The id handed to the first product ever stored.
    pub const FIRST: Self = Self(1);

    /// Returns the inner integer.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` for the zero id, which payloads use to mean "absent".
    #[must_use]
    pub fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Returns the id following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    /// Parses a decimal integer with an optional sign, e.g. `"42"` or `"-3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}
