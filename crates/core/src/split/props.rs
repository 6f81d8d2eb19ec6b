//! Property-based tests for the splitting engine.
//!
//! - Exact sum of every accepted partition
//! - Part bounds
//! - Identity below the maximum part value
//! - Rejection of non-multiples in integer mode
//! - Single-pass termination of the deterministic fallback

use invsplit_shared::{MonetaryAmount, SplitMode};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;

use super::fallback::DeterministicSplitter;
use super::planner::PartitionPlanner;
use super::types::{PartBounds, SplitMethod, SplitPolicy};

/// Strategy to generate amounts from 0.01 to 100,000.00.
fn any_amount() -> impl Strategy<Value = MonetaryAmount> {
    (1i64..10_000_000i64).prop_map(MonetaryAmount::from_cents)
}

/// Strategy to generate maximum part values from 10.00 to 1,000.00.
fn max_part_value() -> impl Strategy<Value = MonetaryAmount> {
    (1_000i64..100_000i64).prop_map(MonetaryAmount::from_cents)
}

/// Strategy to generate multiples of 5 from 5 to 50,000.
fn multiple_of_five() -> impl Strategy<Value = MonetaryAmount> {
    (1i64..10_000i64).prop_map(|units| MonetaryAmount::from_units(units * 5))
}

fn decimal_policy(max: MonetaryAmount) -> SplitPolicy {
    SplitPolicy::new(max, max, MonetaryAmount::CENT, SplitMode::Decimal)
        .expect("generated policy is valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful plan adds up to its source exactly and keeps every
    /// part within `[min_unit, max_part_value)`.
    #[test]
    fn prop_plan_preserves_sum_and_bounds(
        value in any_amount(),
        max in max_part_value(),
        seed in any::<u64>(),
    ) {
        let policy = decimal_policy(max);
        let outcome = PartitionPlanner::plan_with_rng(
            value,
            &policy,
            &mut StdRng::seed_from_u64(seed),
        )
        .expect("no splitter defect");

        if let Some(partition) = outcome.partition() {
            let sum: MonetaryAmount = partition.parts().iter().sum();
            prop_assert_eq!(sum, value, "parts must add up to the source");
            if partition.len() > 1 {
                for part in partition.parts() {
                    prop_assert!(
                        policy.bounds().contains(*part),
                        "part {} outside [0.01, {})",
                        part, max
                    );
                }
            }
        }
    }

    /// Values at or above the threshold but below the maximum are never split.
    #[test]
    fn prop_below_max_is_identity(
        max in max_part_value(),
        offset in 1i64..1_000i64,
        seed in any::<u64>(),
    ) {
        let threshold = MonetaryAmount::CENT;
        let value = max - MonetaryAmount::from_cents(offset).min(max - threshold);
        let policy = SplitPolicy::new(threshold, max, MonetaryAmount::CENT, SplitMode::Decimal)
            .expect("generated policy is valid");

        let outcome = PartitionPlanner::plan_with_rng(
            value,
            &policy,
            &mut StdRng::seed_from_u64(seed),
        )
        .expect("no splitter defect");

        prop_assert_eq!(outcome.method(), Some(SplitMethod::BelowMax));
        prop_assert_eq!(outcome.partition().map(|p| p.parts().to_vec()), Some(vec![value]));
    }

    /// Integer mode rejects any value off the 5-unit grid.
    #[test]
    fn prop_integer_mode_rejects_non_multiples(
        base in multiple_of_five(),
        cents in 1i64..500i64,
    ) {
        let value = base + MonetaryAmount::from_cents(cents);
        let policy = SplitPolicy::new(
            MonetaryAmount::from_units(5),
            MonetaryAmount::from_units(500),
            MonetaryAmount::CENT,
            SplitMode::IntegerMultipleOfFive,
        )
        .expect("generated policy is valid");

        let outcome = PartitionPlanner::plan(value, &policy).expect("no splitter defect");
        prop_assert!(!outcome.is_split());
        prop_assert_eq!(outcome.reason().map(|r| r.error_code()), Some("NOT_DIVISIBLE"));
    }

    /// Integer mode parts stay on the 5-unit grid and add up exactly.
    #[test]
    fn prop_integer_parts_are_multiples_of_five(
        value in multiple_of_five(),
    ) {
        let policy = SplitPolicy::new(
            MonetaryAmount::from_units(5),
            MonetaryAmount::from_units(500),
            MonetaryAmount::CENT,
            SplitMode::IntegerMultipleOfFive,
        )
        .expect("generated policy is valid");

        let outcome = PartitionPlanner::plan(value, &policy).expect("no splitter defect");
        if let Some(partition) = outcome.partition() {
            let sum: MonetaryAmount = partition.parts().iter().sum();
            prop_assert_eq!(sum, value);
            for part in partition.parts() {
                prop_assert!(part.is_multiple_of(Decimal::from(5)), "part {} is off the grid", part);
            }
        }
    }

    /// The fallback either fails structurally or returns exactly `parts`
    /// near-equal values, never differing by more than one minimum unit.
    #[test]
    fn prop_fallback_is_single_pass(
        value in any_amount(),
        parts in 1usize..200,
        max in max_part_value(),
    ) {
        let bounds = PartBounds::new(MonetaryAmount::CENT, max);
        if let Ok(partition) = DeterministicSplitter::split(value, parts, bounds) {
            prop_assert_eq!(partition.len(), parts);
            let first = partition.parts()[0];
            let last = partition.parts()[parts - 1];
            prop_assert!(first - last <= MonetaryAmount::CENT);
            prop_assert!(first >= last);
        }
    }
}
