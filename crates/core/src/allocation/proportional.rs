//! Proportional re-apportionment of dependent columns.
//!
//! Every part except the last receives `quantize(original × ratio)`; the last
//! part receives the residual, so the allocation adds up to the original by
//! construction. The one exception: a non-negative original whose residual
//! goes negative has its last part clamped to zero. That allocation no longer
//! adds up and is flagged through [`ProportionalAllocation::residual_clamped`].

use invsplit_shared::MonetaryAmount;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::split::Partition;

/// Per-part allocation of one dependent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProportionalAllocation {
    values: Vec<MonetaryAmount>,
    residual_clamped: bool,
}

impl ProportionalAllocation {
    /// Allocated values in part order.
    #[must_use]
    pub fn values(&self) -> &[MonetaryAmount] {
        &self.values
    }

    /// True if the last value was clamped to zero and the sum is short.
    #[must_use]
    pub const fn residual_clamped(&self) -> bool {
        self.residual_clamped
    }

    /// Sum of the allocated values.
    #[must_use]
    pub fn total(&self) -> MonetaryAmount {
        self.values.iter().sum()
    }

    /// Consumes the allocation, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<MonetaryAmount> {
        self.values
    }
}

/// Residual-to-last proportional allocator.
pub struct ProportionalAllocator;

impl ProportionalAllocator {
    /// Allocate `original` across `ratios`.
    ///
    /// An empty `ratios` slice yields an empty allocation.
    ///
    /// # Example
    ///
    /// ```
    /// use invsplit_core::allocation::ProportionalAllocator;
    /// use invsplit_shared::MonetaryAmount;
    /// use rust_decimal_macros::dec;
    ///
    /// let tax = MonetaryAmount::from_units(30);
    /// let allocation = ProportionalAllocator::allocate(tax, &[dec!(0.4), dec!(0.6)]);
    ///
    /// assert_eq!(allocation.values(), &[MonetaryAmount::from_units(12), MonetaryAmount::from_units(18)]);
    /// ```
    #[must_use]
    pub fn allocate(original: MonetaryAmount, ratios: &[Decimal]) -> ProportionalAllocation {
        let Some((_, head)) = ratios.split_last() else {
            return ProportionalAllocation {
                values: Vec::new(),
                residual_clamped: false,
            };
        };

        let mut values: Vec<MonetaryAmount> = head
            .iter()
            .map(|ratio| MonetaryAmount::quantize(original.scaled(*ratio)))
            .collect();
        let allocated: MonetaryAmount = values.iter().sum();
        let residual = original - allocated;

        let residual_clamped = residual.is_negative() && !original.is_negative();
        if residual_clamped {
            warn!(%original, %residual, parts = ratios.len(), "negative residual clamped to zero");
            values.push(MonetaryAmount::ZERO);
        } else {
            values.push(residual);
        }

        ProportionalAllocation {
            values,
            residual_clamped,
        }
    }

    /// Allocate `original` using the exact part ratios of `partition`.
    #[must_use]
    pub fn allocate_for(original: MonetaryAmount, partition: &Partition) -> ProportionalAllocation {
        Self::allocate(original, &partition.ratios())
    }
}
