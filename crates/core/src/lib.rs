//! Core partitioning logic for Invsplit.
//!
//! This crate contains pure business logic with ZERO file or spreadsheet dependencies.
//! Amounts come in already parsed; parts and allocations go out as plain values.
//!
//! # Modules
//!
//! - `split` - Partition planner and splitters
//! - `allocation` - Proportional re-apportionment of dependent columns
//! - `batch` - Row batch orchestration and run summary

pub mod allocation;
pub mod batch;
pub mod split;

pub use allocation::{ProportionalAllocation, ProportionalAllocator};
pub use batch::{BatchOutput, BatchProcessor, BatchReport, SourceRow};
pub use split::{PartitionPlanner, Partition, SplitError, SplitMethod, SplitOutcome, SplitPolicy};
