//! Property-based tests for proportional allocation.

use invsplit_shared::MonetaryAmount;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::proportional::ProportionalAllocator;
use crate::split::{PartBounds, Partition};

/// Strategy to generate dependent values (0.00 to 100,000.00).
fn dependent_value() -> impl Strategy<Value = MonetaryAmount> {
    (0i64..10_000_000i64).prop_map(MonetaryAmount::from_cents)
}

/// Strategy to generate 1-20 ratios that sum to 1.
fn ratios_summing_to_one() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..1_000, 1..20).prop_map(|weights| {
        let sum: u32 = weights.iter().sum();
        weights
            .iter()
            .map(|w| Decimal::from(*w) / Decimal::from(sum))
            .collect()
    })
}

/// Strategy to generate a partition of up to 20 parts of 0.01 to 499.99.
fn partition() -> impl Strategy<Value = Partition> {
    prop::collection::vec(1i64..50_000i64, 1..20).prop_map(|cents| {
        let parts: Vec<MonetaryAmount> = cents.into_iter().map(MonetaryAmount::from_cents).collect();
        let source: MonetaryAmount = parts.iter().sum();
        let bounds = PartBounds::new(MonetaryAmount::CENT, MonetaryAmount::from_units(500));
        Partition::new(source, parts, bounds).expect("parts add up by construction")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Unless the residual was clamped, the allocation adds up exactly.
    #[test]
    fn prop_allocation_sum_is_exact(
        original in dependent_value(),
        ratios in ratios_summing_to_one(),
    ) {
        let allocation = ProportionalAllocator::allocate(original, &ratios);
        prop_assert_eq!(allocation.values().len(), ratios.len());
        if !allocation.residual_clamped() {
            prop_assert_eq!(allocation.total(), original);
        }
    }

    /// Non-negative originals never produce negative allocations.
    #[test]
    fn prop_allocation_is_non_negative(
        original in dependent_value(),
        ratios in ratios_summing_to_one(),
    ) {
        let allocation = ProportionalAllocator::allocate(original, &ratios);
        for value in allocation.values() {
            prop_assert!(!value.is_negative(), "allocation {} is negative", value);
        }
    }

    /// Partition ratios allocate the partition's own source back onto its parts.
    #[test]
    fn prop_partition_ratios_reproduce_parts(
        partition in partition(),
    ) {
        let allocation = ProportionalAllocator::allocate_for(partition.source(), &partition);
        prop_assert_eq!(allocation.values(), partition.parts());
    }
}
