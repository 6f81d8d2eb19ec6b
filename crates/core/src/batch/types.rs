//! Batch row and report types.

use std::collections::BTreeMap;

use invsplit_shared::MonetaryAmount;
use serde::{Deserialize, Serialize};

use crate::split::SplitMethod;

/// One input row: the amount to split plus its dependent columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    /// Caller-defined row identifier, e.g. `Sheet1!12`.
    pub id: String,
    /// Amount column.
    pub amount: MonetaryAmount,
    /// Dependent columns re-apportioned across the parts, keyed by name.
    /// Values off the cent grid are rejected like `amount`.
    #[serde(default)]
    pub dependents: BTreeMap<String, MonetaryAmount>,
}

impl SourceRow {
    /// Creates a row with no dependent columns.
    #[must_use]
    pub fn new(id: impl Into<String>, amount: MonetaryAmount) -> Self {
        Self {
            id: id.into(),
            amount,
            dependents: BTreeMap::new(),
        }
    }

    /// Adds a dependent column.
    #[must_use]
    pub fn with_dependent(mut self, column: impl Into<String>, value: MonetaryAmount) -> Self {
        self.dependents.insert(column.into(), value);
        self
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSlice {
    /// Part amount.
    pub amount: MonetaryAmount,
    /// Allocated dependent values, keyed like the source row.
    pub dependents: BTreeMap<String, MonetaryAmount>,
}

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Left as is: below the threshold or already below the maximum.
    Unchanged,
    /// Replaced by two or more slices.
    Split,
    /// A split was needed but is not possible; the row is left as is.
    Unsplittable,
    /// A splitter defect was detected; the row is left as is.
    Failed,
}

/// Per-row result, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowResult {
    /// Source row identifier.
    pub id: String,
    /// Outcome kind.
    pub status: RowStatus,
    /// Path that produced the slices, when planned successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<SplitMethod>,
    /// Replacement rows. A single slice when the row is not split.
    pub slices: Vec<RowSlice>,
    /// Error code when not split for a reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Human-readable reason when not split for a reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Dependent columns whose last slice was clamped to zero.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clamped_columns: Vec<String>,
}

impl RowResult {
    /// Number of extra rows the writer must insert for this row.
    #[must_use]
    pub fn inserted_rows(&self) -> usize {
        self.slices.len().saturating_sub(1)
    }
}

/// A row that needed a split but could not get one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Source row identifier.
    pub id: String,
    /// Source amount.
    pub value: MonetaryAmount,
    /// Human-readable reason.
    pub reason: String,
    /// Machine-readable error code.
    pub code: &'static str,
}

/// A row aborted by a splitter defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Source row identifier.
    pub id: String,
    /// Source amount.
    pub value: MonetaryAmount,
    /// Error message.
    pub message: String,
}

/// A dependent column whose allocation was clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClampedColumn {
    /// Source row identifier.
    pub id: String,
    /// Dependent column name.
    pub column: String,
}

/// Run summary for one or more batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Number of batches (files) aggregated into this report.
    pub total_files: usize,
    /// Rows examined.
    pub processed_rows: usize,
    /// Rows replaced by two or more slices.
    pub split_rows: usize,
    /// Split rows with more than two slices.
    pub multi_splits_performed: usize,
    /// Rows left unsplit for a reason.
    pub skipped: Vec<SkippedRow>,
    /// Rows aborted by a splitter defect.
    pub errors: Vec<RowError>,
    /// Lossy residual clamps.
    pub clamped: Vec<ClampedColumn>,
}

impl BatchReport {
    /// Records one row result.
    pub fn record(&mut self, row: &RowResult, value: MonetaryAmount) {
        self.processed_rows += 1;
        match row.status {
            RowStatus::Split => {
                self.split_rows += 1;
                if row.slices.len() > 2 {
                    self.multi_splits_performed += 1;
                }
            }
            RowStatus::Unsplittable => self.skipped.push(SkippedRow {
                id: row.id.clone(),
                value,
                reason: row.reason.clone().unwrap_or_default(),
                code: row.code.unwrap_or_default(),
            }),
            RowStatus::Failed => self.errors.push(RowError {
                id: row.id.clone(),
                value,
                message: row.reason.clone().unwrap_or_default(),
            }),
            RowStatus::Unchanged => {}
        }
        self.clamped
            .extend(row.clamped_columns.iter().map(|column| ClampedColumn {
                id: row.id.clone(),
                column: column.clone(),
            }));
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.total_files += other.total_files;
        self.processed_rows += other.processed_rows;
        self.split_rows += other.split_rows;
        self.multi_splits_performed += other.multi_splits_performed;
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
        self.clamped.extend(other.clamped);
    }

    /// Returns true if no row was skipped, failed or clamped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty() && self.clamped.is_empty()
    }
}

/// Rows and report produced by one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutput {
    /// Per-row results in input order.
    pub rows: Vec<RowResult>,
    /// Summary.
    pub report: BatchReport,
}
