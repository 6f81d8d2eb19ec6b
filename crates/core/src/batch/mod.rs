//! Row batch orchestration.
//!
//! Runs the planner over every candidate row, re-apportions dependent
//! columns, and collects the run summary.

pub mod processor;
pub mod types;


pub use processor::BatchProcessor;
pub use types::{
    BatchOutput, BatchReport, ClampedColumn, RowError, RowResult, RowSlice, RowStatus, SkippedRow,
    SourceRow,
};
