//! Monetary amount partitioning.
//!
//! This module implements the splitting engine:
//! - Split policy and partition types
//! - Partition planner (decision table and routing)
//! - Randomized normalized splitter with bounded retries
//! - Deterministic floor-and-remainder fallback
//! - Integer multiple-of-5 splitter

pub mod error;
pub mod fallback;
pub mod multiple;
pub mod normalized;
pub mod planner;
pub mod types;

#[cfg(test)]
mod props;

pub use error::SplitError;
pub use fallback::DeterministicSplitter;
pub use multiple::{BASE_UNIT, MultipleOfFiveSplitter};
pub use normalized::NormalizedSplitter;
pub use planner::PartitionPlanner;
pub use types::{
    DEFAULT_MAX_ATTEMPTS, PartBounds, Partition, SplitEvent, SplitMethod, SplitOutcome, SplitPolicy,
};
