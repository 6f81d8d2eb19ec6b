//! Row batch processor.
//!
//! Rows are independent, so they are planned in parallel. Each row gets its
//! own random generator: derived from the batch seed and the row index when a
//! seed is set, the thread-local generator otherwise. Output order always
//! matches input order.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{error, info};

use super::types::{BatchOutput, BatchReport, RowResult, RowSlice, RowStatus, SourceRow};
use crate::allocation::ProportionalAllocator;
use crate::split::{Partition, PartitionPlanner, SplitOutcome, SplitPolicy};

/// Plans and apportions a batch of rows under one policy.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    policy: SplitPolicy,
    seed: Option<u64>,
}

impl BatchProcessor {
    /// Creates a processor using the thread-local random generator.
    #[must_use]
    pub const fn new(policy: SplitPolicy) -> Self {
        Self { policy, seed: None }
    }

    /// Makes every run of the processor reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Policy applied to every row.
    #[must_use]
    pub const fn policy(&self) -> &SplitPolicy {
        &self.policy
    }

    /// Processes `rows`, never aborting on a single row's failure.
    #[must_use]
    pub fn process(&self, rows: &[SourceRow]) -> BatchOutput {
        let results: Vec<RowResult> = rows
            .par_iter()
            .enumerate()
            .map(|(index, row)| self.process_row(index, row))
            .collect();

        let mut report = BatchReport {
            total_files: 1,
            ..BatchReport::default()
        };
        for (row, result) in rows.iter().zip(&results) {
            report.record(result, row.amount);
        }

        info!(
            processed_rows = report.processed_rows,
            split_rows = report.split_rows,
            multi_splits = report.multi_splits_performed,
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            clamped = report.clamped.len(),
            "batch processed"
        );

        BatchOutput {
            rows: results,
            report,
        }
    }

    fn process_row(&self, index: usize, row: &SourceRow) -> RowResult {
        if !self.policy.triggers(row.amount) {
            return Self::unchanged(row, RowStatus::Unchanged);
        }

        let planned = match self.seed {
            Some(seed) => {
                let offset = u64::try_from(index).unwrap_or(u64::MAX);
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(offset));
                PartitionPlanner::plan_with_rng(row.amount, &self.policy, &mut rng)
            }
            None => PartitionPlanner::plan(row.amount, &self.policy),
        };

        match planned {
            Ok(SplitOutcome::Success { partition, method }) => {
                if partition.is_identity() {
                    return RowResult {
                        method: Some(method),
                        ..Self::unchanged(row, RowStatus::Unchanged)
                    };
                }
                let (slices, clamped_columns) = Self::slices(row, &partition);
                RowResult {
                    id: row.id.clone(),
                    status: RowStatus::Split,
                    method: Some(method),
                    slices,
                    code: None,
                    reason: None,
                    clamped_columns,
                }
            }
            Ok(SplitOutcome::Unsplittable { reason, .. }) => RowResult {
                code: Some(reason.error_code()),
                reason: Some(reason.to_string()),
                ..Self::unchanged(row, RowStatus::Unsplittable)
            },
            Err(err) => {
                error!(row = %row.id, error = %err, "row aborted");
                RowResult {
                    code: Some(err.error_code()),
                    reason: Some(err.to_string()),
                    ..Self::unchanged(row, RowStatus::Failed)
                }
            }
        }
    }

    /// The row as a single slice, dependents untouched.
    fn unchanged(row: &SourceRow, status: RowStatus) -> RowResult {
        RowResult {
            id: row.id.clone(),
            status,
            method: None,
            slices: vec![RowSlice {
                amount: row.amount,
                dependents: row.dependents.clone(),
            }],
            code: None,
            reason: None,
            clamped_columns: Vec::new(),
        }
    }

    fn slices(row: &SourceRow, partition: &Partition) -> (Vec<RowSlice>, Vec<String>) {
        let mut slices: Vec<RowSlice> = partition
            .parts()
            .iter()
            .map(|part| RowSlice {
                amount: *part,
                dependents: BTreeMap::new(),
            })
            .collect();
        let mut clamped = Vec::new();

        for (column, value) in &row.dependents {
            let allocation = ProportionalAllocator::allocate_for(*value, partition);
            if allocation.residual_clamped() {
                clamped.push(column.clone());
            }
            for (slice, allocated) in slices.iter_mut().zip(allocation.into_values()) {
                slice.dependents.insert(column.clone(), allocated);
            }
        }

        (slices, clamped)
    }
}
