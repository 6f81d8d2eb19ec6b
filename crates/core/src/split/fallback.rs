//! Deterministic floor-and-remainder splitter.
//!
//! Used when the randomized splitter cannot converge. It makes a single pass
//! over the parts and never retries:
//! 1. Floor `value / N` onto the grid to get the base part
//! 2. Compute the remainder `value - base × N`
//! 3. Add one minimum unit to each of the first `remainder / min_unit` parts

use invsplit_shared::{MonetaryAmount, Rounding};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::debug;

use super::error::SplitError;
use super::types::{PartBounds, Partition};

/// Deterministic fallback splitter.
pub struct DeterministicSplitter;

impl DeterministicSplitter {
    /// Split `value` into `parts` near-equal parts within `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::StructuralInfeasible`] if the base part is below the
    /// minimum unit or the remainder cannot be placed below the maximum, and
    /// [`SplitError::SumMismatch`] if the produced parts do not add up.
    ///
    /// # Example
    ///
    /// ```
    /// use invsplit_core::split::{DeterministicSplitter, PartBounds};
    /// use invsplit_shared::MonetaryAmount;
    ///
    /// let bounds = PartBounds::new(MonetaryAmount::CENT, MonetaryAmount::from_units(500));
    /// let partition =
    ///     DeterministicSplitter::split(MonetaryAmount::from_units(1000), 3, bounds).unwrap();
    ///
    /// // 1000 / 3 = [333.34, 333.33, 333.33]
    /// assert_eq!(partition.parts()[0], MonetaryAmount::from_cents(33_334));
    /// assert_eq!(partition.parts()[2], MonetaryAmount::from_cents(33_333));
    /// ```
    pub fn split(
        value: MonetaryAmount,
        parts: usize,
        bounds: PartBounds,
    ) -> Result<Partition, SplitError> {
        let min_unit = bounds.min_unit;
        let infeasible = |reason: &'static str| SplitError::StructuralInfeasible {
            value,
            parts,
            reason,
        };

        if parts == 0 || value < min_unit.times(parts) {
            return Err(infeasible("value cannot give every part the minimum unit"));
        }

        let base = MonetaryAmount::round(value.as_decimal() / Decimal::from(parts), Rounding::Floor);
        if base < min_unit {
            debug!(%value, parts, %base, "base part below minimum unit");
            return Err(infeasible("base part below minimum unit"));
        }

        let remainder = value - base.times(parts);
        if !remainder.is_multiple_of(min_unit.as_decimal()) {
            return Err(infeasible("remainder is not a whole number of minimum units"));
        }
        let increments = (remainder.as_decimal() / min_unit.as_decimal())
            .floor()
            .to_usize()
            .unwrap_or(usize::MAX);

        if increments > 0 && base + min_unit >= bounds.max_part_value {
            debug!(%value, parts, %base, "incrementing base part would reach the maximum");
            return Err(infeasible("increment would reach the maximum part value"));
        }
        if increments > parts {
            return Err(infeasible("remainder exceeds one minimum unit per part"));
        }

        let mut values = vec![base; parts];
        for part in values.iter_mut().take(increments) {
            *part += min_unit;
        }

        let total: MonetaryAmount = values.iter().sum();
        if (total - value).abs().as_decimal() >= min_unit.as_decimal() / Decimal::TWO {
            return Err(SplitError::SumMismatch {
                expected: value,
                actual: total,
            });
        }

        let partition = Partition::new(value, values, bounds)?;
        debug!(%value, parts, %base, increments, "deterministic split produced");
        Ok(partition)
    }
}
