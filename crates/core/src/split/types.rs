//! Split data types.

use invsplit_shared::{MonetaryAmount, SplitMode, SplitSettings};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::SplitError;

/// Default attempt budget for the randomized splitter.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Half-open range `[min_unit, max_part_value)` every split part must lie in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartBounds {
    /// Smallest admissible part (inclusive).
    pub min_unit: MonetaryAmount,
    /// Upper bound (exclusive).
    pub max_part_value: MonetaryAmount,
}

impl PartBounds {
    /// Creates bounds for `[min_unit, max_part_value)`.
    #[must_use]
    pub const fn new(min_unit: MonetaryAmount, max_part_value: MonetaryAmount) -> Self {
        Self {
            min_unit,
            max_part_value,
        }
    }

    /// Returns true if `part` lies within the bounds.
    #[must_use]
    pub fn contains(&self, part: MonetaryAmount) -> bool {
        part >= self.min_unit && part < self.max_part_value
    }
}

/// Validated parameters that drive the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitPolicy {
    threshold: MonetaryAmount,
    max_part_value: MonetaryAmount,
    min_unit: MonetaryAmount,
    mode: SplitMode,
    max_attempts: u32,
}

impl SplitPolicy {
    /// Creates a validated policy with the default attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidPolicy`] if the bounds are non-positive or
    /// inverted, or if integer mode receives values that are not multiples of 5.
    pub fn new(
        threshold: MonetaryAmount,
        max_part_value: MonetaryAmount,
        min_unit: MonetaryAmount,
        mode: SplitMode,
    ) -> Result<Self, SplitError> {
        let policy = Self {
            threshold,
            max_part_value,
            min_unit,
            mode,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Replaces the randomized splitter's attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    fn validate(&self) -> Result<(), SplitError> {
        if self.min_unit <= MonetaryAmount::ZERO {
            return Err(SplitError::InvalidPolicy(
                "min_unit must be positive".to_string(),
            ));
        }
        if self.threshold <= MonetaryAmount::ZERO {
            return Err(SplitError::InvalidPolicy(
                "threshold must be positive".to_string(),
            ));
        }
        if self.max_part_value <= self.min_unit {
            return Err(SplitError::InvalidPolicy(format!(
                "max_part_value {} must exceed min_unit {}",
                self.max_part_value, self.min_unit
            )));
        }
        if let Some(base_unit) = self.mode.base_unit() {
            let base = Decimal::from(base_unit);
            if !self.threshold.is_multiple_of(base) || !self.max_part_value.is_multiple_of(base) {
                return Err(SplitError::InvalidPolicy(format!(
                    "threshold and max_part_value must be multiples of {base_unit} in {} mode",
                    self.mode
                )));
            }
            if self.min_unit.as_decimal() > base {
                return Err(SplitError::InvalidPolicy(format!(
                    "min_unit {} exceeds the base unit {base_unit}",
                    self.min_unit
                )));
            }
        }
        Ok(())
    }

    /// Minimum amount that triggers split evaluation.
    #[must_use]
    pub const fn threshold(&self) -> MonetaryAmount {
        self.threshold
    }

    /// Exclusive upper bound per part.
    #[must_use]
    pub const fn max_part_value(&self) -> MonetaryAmount {
        self.max_part_value
    }

    /// Smallest admissible part.
    #[must_use]
    pub const fn min_unit(&self) -> MonetaryAmount {
        self.min_unit
    }

    /// Splitting discipline.
    #[must_use]
    pub const fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Attempt budget for the randomized splitter.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Part bounds implied by this policy.
    #[must_use]
    pub const fn bounds(&self) -> PartBounds {
        PartBounds::new(self.min_unit, self.max_part_value)
    }

    /// Returns true if `value` is a split candidate.
    #[must_use]
    pub fn triggers(&self, value: MonetaryAmount) -> bool {
        value >= self.threshold
    }
}

impl TryFrom<&SplitSettings> for SplitPolicy {
    type Error = SplitError;

    fn try_from(settings: &SplitSettings) -> Result<Self, Self::Error> {
        Ok(Self::new(
            settings.threshold,
            settings.effective_max_split(),
            settings.min_unit,
            settings.mode,
        )?
        .with_max_attempts(settings.max_attempts))
    }
}

/// Ordered parts replacing one source amount.
///
/// Construction checks that the parts add up to the source exactly, so a
/// `Partition` that exists is always sum-preserving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    source: MonetaryAmount,
    parts: Vec<MonetaryAmount>,
}

impl Partition {
    /// Builds a partition, checking bounds then the exact sum.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::StructuralInfeasible`] if `parts` is empty or a part
    /// falls outside `bounds`, and [`SplitError::SumMismatch`] if the parts do
    /// not add up to `source`.
    pub fn new(
        source: MonetaryAmount,
        parts: Vec<MonetaryAmount>,
        bounds: PartBounds,
    ) -> Result<Self, SplitError> {
        if parts.is_empty() {
            return Err(SplitError::StructuralInfeasible {
                value: source,
                parts: 0,
                reason: "partition has no parts",
            });
        }
        if !parts.iter().all(|part| bounds.contains(*part)) {
            return Err(SplitError::StructuralInfeasible {
                value: source,
                parts: parts.len(),
                reason: "part outside [min_unit, max_part_value)",
            });
        }
        let actual: MonetaryAmount = parts.iter().sum();
        if actual != source {
            return Err(SplitError::SumMismatch {
                expected: source,
                actual,
            });
        }
        Ok(Self { source, parts })
    }

    /// The unsplit partition `[source]`.
    #[must_use]
    pub fn identity(source: MonetaryAmount) -> Self {
        Self {
            source,
            parts: vec![source],
        }
    }

    /// Source amount.
    #[must_use]
    pub const fn source(&self) -> MonetaryAmount {
        self.source
    }

    /// Parts in order.
    #[must_use]
    pub fn parts(&self) -> &[MonetaryAmount] {
        &self.parts
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false: a partition has at least one part.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns true if no physical split is needed.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.parts.len() == 1
    }

    /// Exact per-part fractions `part / source`.
    ///
    /// A zero source yields a uniform `1/N` for every part.
    #[must_use]
    pub fn ratios(&self) -> Vec<Decimal> {
        let uniform = Decimal::ONE / Decimal::from(self.parts.len());
        self.parts
            .iter()
            .map(|part| part.ratio_of(self.source).unwrap_or(uniform))
            .collect()
    }
}

/// Which path produced a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SplitMethod {
    /// Value below the threshold; the planner was not needed.
    BelowThreshold,
    /// Value met the threshold but is already below the maximum part value.
    BelowMax,
    /// Uniform random first part inside the 2-way bound window.
    RandomTwoWay,
    /// Exact half split after the random 2-way draw failed.
    HalfTwoWay,
    /// Randomized normalized N-way split.
    RandomNWay {
        /// Part count.
        parts: usize,
    },
    /// Deterministic floor-and-remainder N-way split.
    DeterministicFallback {
        /// Part count.
        parts: usize,
    },
    /// Integer split in multiples of 5.
    IntegerMultipleOfFive {
        /// Part count.
        parts: usize,
    },
}

impl SplitMethod {
    /// Returns the machine-readable method code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BelowThreshold => "below_threshold",
            Self::BelowMax => "below_max",
            Self::RandomTwoWay => "random_two_way",
            Self::HalfTwoWay => "half_two_way",
            Self::RandomNWay { .. } => "random_n_way",
            Self::DeterministicFallback { .. } => "deterministic_fallback",
            Self::IntegerMultipleOfFive { .. } => "integer_multiple_of_five",
        }
    }
}

impl std::fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowThreshold => write!(f, "None (Below Threshold)"),
            Self::BelowMax => write!(f, "None (Below Max)"),
            Self::RandomTwoWay => write!(f, "Random (2-way)"),
            Self::HalfTwoWay => write!(f, "Half (2-way)"),
            Self::RandomNWay { parts } => write!(f, "Random ({parts}-way)"),
            Self::DeterministicFallback { .. } => write!(f, "Deterministic Fallback"),
            Self::IntegerMultipleOfFive { parts } => write!(f, "Integer x5 ({parts}-way)"),
        }
    }
}

/// Result of planning one amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// A partition satisfying every bound, possibly the identity.
    Success {
        /// Accepted partition.
        partition: Partition,
        /// Path that produced it.
        method: SplitMethod,
    },
    /// The amount stays unsplit.
    Unsplittable {
        /// Source amount.
        source: MonetaryAmount,
        /// Why no partition was produced.
        reason: SplitError,
    },
}

impl SplitOutcome {
    /// Source amount the outcome refers to.
    #[must_use]
    pub fn source(&self) -> MonetaryAmount {
        match self {
            Self::Success { partition, .. } => partition.source(),
            Self::Unsplittable { source, .. } => *source,
        }
    }

    /// The accepted partition, if any.
    #[must_use]
    pub fn partition(&self) -> Option<&Partition> {
        match self {
            Self::Success { partition, .. } => Some(partition),
            Self::Unsplittable { .. } => None,
        }
    }

    /// The path that produced the partition, if any.
    #[must_use]
    pub fn method(&self) -> Option<SplitMethod> {
        match self {
            Self::Success { method, .. } => Some(*method),
            Self::Unsplittable { .. } => None,
        }
    }

    /// Why the amount stays unsplit, if it does.
    #[must_use]
    pub fn reason(&self) -> Option<&SplitError> {
        match self {
            Self::Success { .. } => None,
            Self::Unsplittable { reason, .. } => Some(reason),
        }
    }

    /// Returns true if the amount is physically split into two or more rows.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.partition().is_some_and(|p| !p.is_identity())
    }

    /// Audit record for this outcome.
    #[must_use]
    pub fn event(&self) -> SplitEvent {
        match self {
            Self::Success { partition, method } => SplitEvent {
                source_value: partition.source(),
                parts: partition.len(),
                method: Some(*method),
                success: true,
                code: None,
                reason: None,
            },
            Self::Unsplittable { source, reason } => SplitEvent {
                source_value: *source,
                parts: 1,
                method: None,
                success: false,
                code: Some(reason.error_code()),
                reason: Some(reason.to_string()),
            },
        }
    }
}

/// Structured audit event emitted once per planner invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitEvent {
    /// Amount that was planned.
    pub source_value: MonetaryAmount,
    /// Number of parts in the result (1 when unsplit).
    pub parts: usize,
    /// Path that produced the partition.
    pub method: Option<SplitMethod>,
    /// Whether a partition was produced.
    pub success: bool,
    /// Error code when unsplittable.
    pub code: Option<&'static str>,
    /// Human-readable reason when unsplittable.
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> MonetaryAmount {
        MonetaryAmount::try_new(value).unwrap()
    }

    #[test]
    fn test_policy_accepts_valid_bounds() {
        let policy = SplitPolicy::new(
            amount(dec!(500)),
            amount(dec!(500)),
            MonetaryAmount::CENT,
            SplitMode::Decimal,
        )
        .unwrap();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.with_max_attempts(5).max_attempts(), 5);
        assert!(policy.triggers(amount(dec!(500))));
        assert!(!policy.triggers(amount(dec!(499.99))));
    }

    #[rstest]
    #[case(dec!(500), dec!(500), dec!(0), SplitMode::Decimal)]
    #[case(dec!(0), dec!(500), dec!(0.01), SplitMode::Decimal)]
    #[case(dec!(500), dec!(0.01), dec!(0.01), SplitMode::Decimal)]
    #[case(dec!(500), dec!(502), dec!(0.01), SplitMode::IntegerMultipleOfFive)]
    #[case(dec!(501), dec!(500), dec!(0.01), SplitMode::IntegerMultipleOfFive)]
    #[case(dec!(500), dec!(500), dec!(10), SplitMode::IntegerMultipleOfFive)]
    fn test_policy_rejects_invalid_bounds(
        #[case] threshold: Decimal,
        #[case] max_part_value: Decimal,
        #[case] min_unit: Decimal,
        #[case] mode: SplitMode,
    ) {
        let result = SplitPolicy::new(
            amount(threshold),
            amount(max_part_value),
            amount(min_unit),
            mode,
        );
        assert!(matches!(result, Err(SplitError::InvalidPolicy(_))));
    }

    #[test]
    fn test_policy_from_settings_uses_fallback_max() {
        let settings = SplitSettings {
            threshold: amount(dec!(600)),
            max_split_value: None,
            max_attempts: 7,
            ..SplitSettings::default()
        };
        let policy = SplitPolicy::try_from(&settings).unwrap();
        assert_eq!(policy.max_part_value(), amount(dec!(600)));
        assert_eq!(policy.max_attempts(), 7);
    }

    #[test]
    fn test_bounds_are_half_open() {
        let bounds = PartBounds::new(MonetaryAmount::CENT, amount(dec!(500)));
        assert!(bounds.contains(MonetaryAmount::CENT));
        assert!(bounds.contains(amount(dec!(499.99))));
        assert!(!bounds.contains(amount(dec!(500))));
        assert!(!bounds.contains(MonetaryAmount::ZERO));
    }

    #[test]
    fn test_partition_checks_sum() {
        let bounds = PartBounds::new(MonetaryAmount::CENT, amount(dec!(500)));
        let result = Partition::new(
            amount(dec!(700)),
            vec![amount(dec!(350)), amount(dec!(349.99))],
            bounds,
        );
        assert_eq!(
            result,
            Err(SplitError::SumMismatch {
                expected: amount(dec!(700)),
                actual: amount(dec!(699.99)),
            })
        );
    }

    #[test]
    fn test_partition_checks_bounds() {
        let bounds = PartBounds::new(MonetaryAmount::CENT, amount(dec!(500)));
        let result = Partition::new(
            amount(dec!(700)),
            vec![amount(dec!(500)), amount(dec!(200))],
            bounds,
        );
        assert!(matches!(
            result,
            Err(SplitError::StructuralInfeasible { parts: 2, .. })
        ));
    }

    #[test]
    fn test_partition_ratios() {
        let bounds = PartBounds::new(MonetaryAmount::CENT, amount(dec!(500)));
        let partition = Partition::new(
            amount(dec!(700)),
            vec![amount(dec!(280)), amount(dec!(420))],
            bounds,
        )
        .unwrap();
        assert_eq!(partition.ratios(), vec![dec!(0.4), dec!(0.6)]);
    }

    #[test]
    fn test_zero_source_ratios_are_uniform() {
        let partition = Partition::identity(MonetaryAmount::ZERO);
        assert_eq!(partition.ratios(), vec![Decimal::ONE]);
        assert!(partition.is_identity());
        assert!(!partition.is_empty());
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(SplitMethod::BelowMax.to_string(), "None (Below Max)");
        assert_eq!(SplitMethod::RandomTwoWay.to_string(), "Random (2-way)");
        assert_eq!(SplitMethod::HalfTwoWay.to_string(), "Half (2-way)");
        assert_eq!(
            SplitMethod::RandomNWay { parts: 3 }.to_string(),
            "Random (3-way)"
        );
        assert_eq!(
            SplitMethod::DeterministicFallback { parts: 3 }.to_string(),
            "Deterministic Fallback"
        );
        assert_eq!(
            SplitMethod::IntegerMultipleOfFive { parts: 5 }.to_string(),
            "Integer x5 (5-way)"
        );
    }

    #[test]
    fn test_method_codes() {
        assert_eq!(SplitMethod::BelowThreshold.code(), "below_threshold");
        assert_eq!(SplitMethod::HalfTwoWay.code(), "half_two_way");
        assert_eq!(SplitMethod::RandomNWay { parts: 4 }.code(), "random_n_way");
        assert_eq!(
            SplitMethod::DeterministicFallback { parts: 3 }.code(),
            "deterministic_fallback"
        );
        assert_eq!(
            SplitMethod::IntegerMultipleOfFive { parts: 2 }.code(),
            "integer_multiple_of_five"
        );
    }

    #[test]
    fn test_unsplittable_event() {
        let outcome = SplitOutcome::Unsplittable {
            source: amount(dec!(47)),
            reason: SplitError::NotDivisible {
                value: amount(dec!(47)),
                base_unit: 5,
            },
        };
        let event = outcome.event();
        assert!(!event.success);
        assert_eq!(event.parts, 1);
        assert_eq!(event.code, Some("NOT_DIVISIBLE"));
        assert!(!outcome.is_split());
        assert!(outcome.partition().is_none());
    }

    #[test]
    fn test_event_serializes_method_kind() {
        let outcome = SplitOutcome::Success {
            partition: Partition::identity(amount(dec!(450))),
            method: SplitMethod::BelowMax,
        };
        let json = serde_json::to_value(outcome.event()).unwrap();
        assert_eq!(json["method"]["kind"], "below_max");
        assert_eq!(json["source_value"], "450.00");
        assert_eq!(json["success"], true);
    }
}
