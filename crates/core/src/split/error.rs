//! Split error types.
//!
//! Only [`SplitError::SumMismatch`] is fatal: it signals a defect in a
//! splitter and aborts the computation for that amount. [`SplitError::RetryExhausted`]
//! is consumed by the planner, which falls through to the deterministic
//! splitter. Every other kind is reported as an unsplittable amount.

use invsplit_shared::MonetaryAmount;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while partitioning an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Policy bounds are non-positive, inverted, or off the base unit.
    #[error("Invalid split policy: {0}")]
    InvalidPolicy(String),

    /// Source amount cannot enter the engine.
    #[error("Invalid source amount {value}: {reason}")]
    InvalidAmount {
        /// Offending amount.
        value: Decimal,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Integer mode received a value that is not a multiple of the base unit.
    #[error("Value {value} is not a multiple of the base unit {base_unit}")]
    NotDivisible {
        /// Source amount.
        value: MonetaryAmount,
        /// Required base unit.
        base_unit: i64,
    },

    /// Neither a random nor a half 2-way split fits the bounds.
    #[error("No feasible 2-way split for {value} within [{lower}, {upper}]")]
    InfeasibleBounds {
        /// Source amount.
        value: MonetaryAmount,
        /// Lowest admissible first part.
        lower: MonetaryAmount,
        /// Highest admissible first part.
        upper: MonetaryAmount,
    },

    /// The randomized splitter used its whole attempt budget.
    #[error("Randomized split of {value} into {parts} parts failed after {attempts} attempts")]
    RetryExhausted {
        /// Source amount.
        value: MonetaryAmount,
        /// Requested part count.
        parts: usize,
        /// Attempts made.
        attempts: u32,
    },

    /// The base part or its remainder cannot legally fit the bounds.
    #[error("Cannot split {value} into {parts} parts: {reason}")]
    StructuralInfeasible {
        /// Source amount.
        value: MonetaryAmount,
        /// Requested part count.
        parts: usize,
        /// Which structural check failed.
        reason: &'static str,
    },

    /// Parts do not add up to the source amount.
    #[error("Split sum mismatch: expected {expected}, got {actual}")]
    SumMismatch {
        /// Source amount.
        expected: MonetaryAmount,
        /// Sum of the produced parts.
        actual: MonetaryAmount,
    },
}

impl SplitError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPolicy(_) => "INVALID_POLICY",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::NotDivisible { .. } => "NOT_DIVISIBLE",
            Self::InfeasibleBounds { .. } => "INFEASIBLE_BOUNDS",
            Self::RetryExhausted { .. } => "RETRY_EXHAUSTED",
            Self::StructuralInfeasible { .. } => "STRUCTURAL_INFEASIBLE",
            Self::SumMismatch { .. } => "SUM_MISMATCH",
        }
    }

    /// Returns true if the planner recovers from this error on its own.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }

    /// Returns true if this error indicates a splitter defect.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::SumMismatch { .. })
    }
}
