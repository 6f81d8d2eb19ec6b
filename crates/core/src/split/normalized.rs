//! Randomized normalized splitter.
//!
//! Each attempt draws N random weights, scales them to the target value,
//! quantizes, then nudges random parts by one minimum unit until the sum is
//! restored. The attempt and nudge budgets are both fixed, so the splitter
//! always terminates; `None` means "use the deterministic fallback".

use invsplit_shared::MonetaryAmount;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{PartBounds, Partition};

/// Resolution of the random weights: each weight is `k / WEIGHT_RESOLUTION`
/// for a uniform `k` in `1..=WEIGHT_RESOLUTION`, i.e. in `(0, 1]`.
const WEIGHT_RESOLUTION: u32 = 1_000_000;

/// Nudge iterations allowed per part in each attempt.
const NUDGES_PER_PART: usize = 5;

/// Randomized splitter with bounded retries.
pub struct NormalizedSplitter;

impl NormalizedSplitter {
    /// Try to split `value` into `parts` random parts within `bounds`.
    ///
    /// Returns the first accepted partition, or `None` once `max_attempts`
    /// attempts have been rejected.
    pub fn try_split<R: Rng + ?Sized>(
        value: MonetaryAmount,
        parts: usize,
        bounds: PartBounds,
        max_attempts: u32,
        rng: &mut R,
    ) -> Option<Partition> {
        if parts == 0 || value < bounds.min_unit.times(parts) {
            debug!(%value, parts, "cannot give every part the minimum unit");
            return None;
        }

        for attempt in 1..=max_attempts {
            if let Some(partition) = Self::attempt(value, parts, bounds, rng) {
                debug!(%value, parts, attempt, "randomized split accepted");
                return Some(partition);
            }
        }

        debug!(%value, parts, max_attempts, "randomized split exhausted its attempts");
        None
    }

    fn attempt<R: Rng + ?Sized>(
        value: MonetaryAmount,
        parts: usize,
        bounds: PartBounds,
        rng: &mut R,
    ) -> Option<Partition> {
        let weights: Vec<Decimal> = (0..parts)
            .map(|_| Decimal::from(rng.random_range(1..=WEIGHT_RESOLUTION)))
            .collect();
        let total_weight: Decimal = weights.iter().copied().sum();

        let mut candidate: Vec<MonetaryAmount> = weights
            .iter()
            .map(|weight| MonetaryAmount::quantize(value.scaled(*weight / total_weight)))
            .collect();

        if !candidate.iter().all(|part| bounds.contains(*part)) {
            return None;
        }

        let step = bounds.min_unit;
        let tolerance = step.as_decimal() / Decimal::TWO;
        let sum: MonetaryAmount = candidate.iter().sum();
        let mut diff = (value - sum).as_decimal();
        let adjustment = if diff > Decimal::ZERO {
            step
        } else {
            MonetaryAmount::ZERO - step
        };

        let mut nudges = 0;
        while diff.abs() >= tolerance && nudges < parts * NUDGES_PER_PART {
            let index = rng.random_range(0..parts);
            let nudged = candidate[index] + adjustment;
            if bounds.contains(nudged) {
                candidate[index] = nudged;
                diff -= adjustment.as_decimal();
            }
            nudges += 1;
        }

        let total: MonetaryAmount = candidate.iter().sum();
        if (value - total).abs().as_decimal() >= tolerance {
            return None;
        }

        // Within tolerance but off by a sub-unit amount is still rejected: a
        // partition must add up exactly.
        Partition::new(value, candidate, bounds).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> MonetaryAmount {
        MonetaryAmount::try_new(value).unwrap()
    }

    fn bounds(max: Decimal) -> PartBounds {
        PartBounds::new(MonetaryAmount::CENT, amount(max))
    }

    #[test]
    fn test_split_sums_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let partition =
                NormalizedSplitter::try_split(amount(dec!(1200)), 3, bounds(dec!(500)), 100, &mut rng)
                    .expect("1200 into 3 parts below 500 is feasible");
            assert_eq!(partition.len(), 3);
            assert_eq!(partition.parts().iter().sum::<MonetaryAmount>(), amount(dec!(1200)));
            assert!(partition.parts().iter().all(|p| bounds(dec!(500)).contains(*p)));
        }
    }

    #[test]
    fn test_many_parts() {
        let mut rng = StdRng::seed_from_u64(11);
        let partition =
            NormalizedSplitter::try_split(amount(dec!(12345.67)), 40, bounds(dec!(5000)), 100, &mut rng)
                .expect("loose bounds converge");
        assert_eq!(partition.len(), 40);
        assert_eq!(partition.source(), amount(dec!(12345.67)));
        assert!(partition.parts().iter().all(|p| bounds(dec!(5000)).contains(*p)));
    }

    #[test]
    fn test_many_parts_near_the_bound_exhaust() {
        // Mean part is about 309; uniform weights push some part over 500
        // on almost every attempt.
        let mut rng = StdRng::seed_from_u64(11);
        let partition =
            NormalizedSplitter::try_split(amount(dec!(12345.67)), 40, bounds(dec!(500)), 100, &mut rng);
        assert!(partition.is_none());
    }

    #[test]
    fn test_zero_parts_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            NormalizedSplitter::try_split(amount(dec!(1200)), 0, bounds(dec!(500)), 100, &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn test_value_below_min_units_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            NormalizedSplitter::try_split(amount(dec!(0.02)), 3, bounds(dec!(500)), 100, &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn test_impossible_bounds_exhaust() {
        // 3 parts below 400 can never reach 1200
        let mut rng = StdRng::seed_from_u64(3);
        let result =
            NormalizedSplitter::try_split(amount(dec!(1200)), 3, bounds(dec!(400)), 25, &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_attempts_returns_none() {
        let mut rng = StdRng::seed_from_u64(3);
        let result =
            NormalizedSplitter::try_split(amount(dec!(1200)), 3, bounds(dec!(500)), 0, &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn test_same_seed_same_partition() {
        let first = NormalizedSplitter::try_split(
            amount(dec!(2500)),
            6,
            bounds(dec!(500)),
            100,
            &mut StdRng::seed_from_u64(42),
        );
        let second = NormalizedSplitter::try_split(
            amount(dec!(2500)),
            6,
            bounds(dec!(500)),
            100,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(first, second);
    }
}
