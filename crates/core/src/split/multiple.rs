//! Integer splitter for amounts that must stay multiples of 5.
//!
//! Works on whole unit counts (`value / 5`) so no rounding is involved.

use invsplit_shared::MonetaryAmount;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::debug;

use super::error::SplitError;
use super::types::{PartBounds, Partition};

/// Currency units per integer part unit.
pub const BASE_UNIT: i64 = 5;

/// Deterministic multiple-of-5 splitter.
pub struct MultipleOfFiveSplitter;

impl MultipleOfFiveSplitter {
    /// Split `value` into `parts` multiples of 5, each below `max_part_value`.
    ///
    /// Unit counts are spread as evenly as possible and the first parts take
    /// one extra unit each.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::NotDivisible`] if `value` is not a multiple of 5,
    /// and [`SplitError::StructuralInfeasible`] if the units cannot be spread
    /// over `parts` without reaching the maximum.
    pub fn split(
        value: MonetaryAmount,
        parts: usize,
        max_part_value: MonetaryAmount,
    ) -> Result<Partition, SplitError> {
        let base_unit = Decimal::from(BASE_UNIT);
        if !value.is_multiple_of(base_unit) {
            return Err(SplitError::NotDivisible {
                value,
                base_unit: BASE_UNIT,
            });
        }

        let infeasible = |reason: &'static str| SplitError::StructuralInfeasible {
            value,
            parts,
            reason,
        };

        let unit_value = (value.as_decimal() / base_unit)
            .to_i64()
            .ok_or_else(|| infeasible("unit count out of range"))?;
        let max_units = ((max_part_value.as_decimal() - Decimal::ONE) / base_unit)
            .trunc()
            .to_i64()
            .ok_or_else(|| infeasible("maximum unit count out of range"))?;
        let count = i64::try_from(parts).map_err(|_| infeasible("part count out of range"))?;

        if count <= 0 || unit_value < count {
            return Err(infeasible("cannot give every part at least one unit"));
        }
        if max_units <= 0 {
            return Err(infeasible("maximum part value is below one unit"));
        }

        let base = unit_value / count;
        let remainder = unit_value % count;
        if base > max_units {
            return Err(infeasible("base part exceeds the maximum unit count"));
        }
        if base + 1 > max_units && remainder > 0 {
            debug!(%value, parts, base, remainder, max_units, "remainder cannot be absorbed");
            return Err(infeasible("remainder cannot be absorbed below the maximum"));
        }

        let units: Vec<i64> = (0..count)
            .map(|index| if index < remainder { base + 1 } else { base })
            .collect();
        if units.iter().any(|unit| *unit > max_units) {
            return Err(infeasible("part exceeds the maximum unit count"));
        }

        let values = units
            .into_iter()
            .map(|unit| MonetaryAmount::from_units(unit * BASE_UNIT))
            .collect();
        let bounds = PartBounds::new(MonetaryAmount::from_units(BASE_UNIT), max_part_value);
        let partition = Partition::new(value, values, bounds)?;
        debug!(%value, parts, base, remainder, "integer split produced");
        Ok(partition)
    }
}
