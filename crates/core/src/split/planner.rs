//! Partition planner.
//!
//! Decides per amount whether no split, a 2-way split or an N-way split is
//! needed, and routes to the matching splitter:
//!
//! | Mode    | Value                        | Result                               |
//! |---------|------------------------------|--------------------------------------|
//! | any     | `< threshold`                | identity                             |
//! | integer | not a multiple of 5          | unsplittable                         |
//! | any     | `< max_part_value`           | identity                             |
//! | integer | otherwise                    | x5 splitter, `N = max(2, ⌈v/max⌉)`   |
//! | decimal | `< 2 × max_part_value`       | random 2-way, then exact half        |
//! | decimal | otherwise                    | randomized N-way, then deterministic |
//!
//! The identity-below-max row applies to both modes: an integer-mode value
//! that is a multiple of 5 but already below `max_part_value` is not split.

use invsplit_shared::{MonetaryAmount, Rounding, SplitMode};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::{debug, error, info, warn};

use super::error::SplitError;
use super::fallback::DeterministicSplitter;
use super::multiple::MultipleOfFiveSplitter;
use super::normalized::NormalizedSplitter;
use super::types::{Partition, SplitMethod, SplitOutcome, SplitPolicy};

/// Stateless planner over a [`SplitPolicy`].
pub struct PartitionPlanner;

impl PartitionPlanner {
    /// Plan `value` using the thread-local random generator.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::SumMismatch`] if a splitter produced parts that do
    /// not add up. Every other failure is an [`SplitOutcome::Unsplittable`].
    pub fn plan(value: MonetaryAmount, policy: &SplitPolicy) -> Result<SplitOutcome, SplitError> {
        Self::plan_with_rng(value, policy, &mut rand::rng())
    }

    /// Plan `value` drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::SumMismatch`] if a splitter produced parts that do
    /// not add up.
    pub fn plan_with_rng<R: Rng + ?Sized>(
        value: MonetaryAmount,
        policy: &SplitPolicy,
        rng: &mut R,
    ) -> Result<SplitOutcome, SplitError> {
        let outcome = match Self::decide(value, policy, rng) {
            Ok((partition, method)) => SplitOutcome::Success { partition, method },
            Err(err) if err.is_internal() => {
                error!(source_value = %value, error = %err, "splitter defect, aborting plan");
                return Err(err);
            }
            Err(reason) => SplitOutcome::Unsplittable {
                source: value,
                reason,
            },
        };

        let event = outcome.event();
        let method = event.method.map(|m| m.to_string()).unwrap_or_default();
        let reason = event.reason.as_deref().unwrap_or_default();
        if event.success {
            info!(
                source_value = %event.source_value,
                parts = event.parts,
                method = %method,
                method_code = event.method.map(|m| m.code()).unwrap_or_default(),
                success = true,
                "amount planned"
            );
        } else {
            warn!(
                source_value = %event.source_value,
                parts = event.parts,
                code = event.code.unwrap_or_default(),
                success = false,
                reason,
                "amount left unsplit"
            );
        }

        Ok(outcome)
    }

    fn decide<R: Rng + ?Sized>(
        value: MonetaryAmount,
        policy: &SplitPolicy,
        rng: &mut R,
    ) -> Result<(Partition, SplitMethod), SplitError> {
        if value.is_negative() {
            return Err(SplitError::InvalidAmount {
                value: value.as_decimal(),
                reason: "amount must not be negative",
            });
        }
        if !policy.triggers(value) {
            return Ok((Partition::identity(value), SplitMethod::BelowThreshold));
        }

        match policy.mode() {
            SplitMode::IntegerMultipleOfFive => Self::integer(value, policy),
            SplitMode::Decimal => {
                let max = policy.max_part_value();
                if value < max {
                    Ok((Partition::identity(value), SplitMethod::BelowMax))
                } else if value < max.times(2) {
                    Self::two_way(value, policy, rng)
                } else {
                    Self::n_way(value, policy, rng)
                }
            }
        }
    }

    /// Integer mode: rejects non-multiples of 5, keeps values below the
    /// maximum as the identity, then splits into at least two parts.
    fn integer(
        value: MonetaryAmount,
        policy: &SplitPolicy,
    ) -> Result<(Partition, SplitMethod), SplitError> {
        if let Some(base_unit) = policy.mode().base_unit()
            && !value.is_multiple_of(Decimal::from(base_unit))
        {
            return Err(SplitError::NotDivisible { value, base_unit });
        }
        if value < policy.max_part_value() {
            return Ok((Partition::identity(value), SplitMethod::BelowMax));
        }

        let parts = Self::part_count(value, policy)?.max(2);
        let partition = MultipleOfFiveSplitter::split(value, parts, policy.max_part_value())?;
        Ok((partition, SplitMethod::IntegerMultipleOfFive { parts }))
    }

    fn two_way<R: Rng + ?Sized>(
        value: MonetaryAmount,
        policy: &SplitPolicy,
        rng: &mut R,
    ) -> Result<(Partition, SplitMethod), SplitError> {
        let bounds = policy.bounds();
        let min_unit = bounds.min_unit;
        let max = bounds.max_part_value;

        let lower = (value - max + min_unit).max(min_unit);
        let upper = (value - min_unit).min(max - min_unit);
        let lower = MonetaryAmount::round(lower.as_decimal(), Rounding::Ceiling);
        let upper = MonetaryAmount::round(upper.as_decimal(), Rounding::Floor);
        let tolerance = min_unit.as_decimal() / Decimal::TEN;

        let accept = |first: MonetaryAmount| -> Option<Partition> {
            let second = value - first;
            if !bounds.contains(first) || !bounds.contains(second) {
                return None;
            }
            if (first + second - value).abs().as_decimal() >= tolerance {
                return None;
            }
            Partition::new(value, vec![first, second], bounds).ok()
        };

        if lower <= upper {
            let first = Self::draw_between(lower, upper, rng);
            if let Some(partition) = accept(first) {
                return Ok((partition, SplitMethod::RandomTwoWay));
            }
        } else {
            debug!(%value, %lower, %upper, "2-way window is empty, trying exact half");
        }

        let half = MonetaryAmount::quantize(value.as_decimal() / Decimal::TWO);
        match accept(half) {
            Some(partition) => Ok((partition, SplitMethod::HalfTwoWay)),
            None => Err(SplitError::InfeasibleBounds {
                value,
                lower,
                upper,
            }),
        }
    }

    fn n_way<R: Rng + ?Sized>(
        value: MonetaryAmount,
        policy: &SplitPolicy,
        rng: &mut R,
    ) -> Result<(Partition, SplitMethod), SplitError> {
        let parts = Self::part_count(value, policy)?.max(3);
        let bounds = policy.bounds();
        let attempts = policy.max_attempts();

        NormalizedSplitter::try_split(value, parts, bounds, attempts, rng)
            .map(|partition| (partition, SplitMethod::RandomNWay { parts }))
            .ok_or(SplitError::RetryExhausted {
                value,
                parts,
                attempts,
            })
            .or_else(|exhausted| {
                warn!(%value, parts, error = %exhausted, "falling back to deterministic split");
                DeterministicSplitter::split(value, parts, bounds)
                    .map(|partition| (partition, SplitMethod::DeterministicFallback { parts }))
            })
    }

    /// `⌈value / max_part_value⌉` as a part count.
    fn part_count(value: MonetaryAmount, policy: &SplitPolicy) -> Result<usize, SplitError> {
        value
            .as_decimal()
            .checked_div(policy.max_part_value().as_decimal())
            .map(|ratio| ratio.ceil())
            .and_then(|ratio| ratio.to_usize())
            .ok_or(SplitError::StructuralInfeasible {
                value,
                parts: 0,
                reason: "part count out of range",
            })
    }

    /// A uniformly drawn cent in `[lower, upper]`.
    fn draw_between<R: Rng + ?Sized>(
        lower: MonetaryAmount,
        upper: MonetaryAmount,
        rng: &mut R,
    ) -> MonetaryAmount {
        match (lower.cents(), upper.cents()) {
            (Some(low), Some(high)) if low < high => {
                MonetaryAmount::from_cents(rng.random_range(low..=high))
            }
            _ => lower,
        }
    }
}
