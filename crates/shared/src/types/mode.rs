//! Splitting discipline selected for a run.

use serde::{Deserialize, Serialize};

/// How a split candidate is divided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Parts on the cent grid, drawn at random then corrected.
    #[default]
    Decimal,
    /// Parts are whole multiples of 5 currency units.
    #[serde(alias = "integer_5")]
    IntegerMultipleOfFive,
}

impl SplitMode {
    /// Base unit every part must be a multiple of, if any.
    #[must_use]
    pub const fn base_unit(self) -> Option<i64> {
        match self {
            Self::Decimal => None,
            Self::IntegerMultipleOfFive => Some(5),
        }
    }
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::IntegerMultipleOfFive => write!(f, "integer_multiple_of_five"),
        }
    }
}

impl std::str::FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "decimal" => Ok(Self::Decimal),
            "integer_multiple_of_five" | "integer_5" => Ok(Self::IntegerMultipleOfFive),
            _ => Err(format!("Unknown split mode: {s}")),
        }
    }
}
