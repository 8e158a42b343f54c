//! Results of a sweep: one row per combination of dimension values.

use std::fmt::Display;

use itertools::Itertools;

use crate::serde::{git_branch_name::GitBranchName, task::Task};

/// The value of one varying dimension in a row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Branch(GitBranchName),
    Int(u64),
    Task(Task),
}

impl Display for DimensionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionValue::Branch(b) => b.fmt(f),
            DimensionValue::Int(i) => i.fmt(f),
            DimensionValue::Task(t) => t.fmt(f),
        }
    }
}

impl From<GitBranchName> for DimensionValue {
    fn from(value: GitBranchName) -> Self {
        DimensionValue::Branch(value)
    }
}

impl From<u64> for DimensionValue {
    fn from(value: u64) -> Self {
        DimensionValue::Int(value)
    }
}

impl From<Task> for DimensionValue {
    fn from(value: Task) -> Self {
        DimensionValue::Task(value)
    }
}

/// Positional view of a row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Dimension(DimensionValue),
    /// Averaged tick count
    Measurement(f64),
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Dimension(v) => v.fmt(f),
            Cell::Measurement(x) => x.fmt(f),
        }
    }
}

impl From<DimensionValue> for Cell {
    fn from(value: DimensionValue) -> Self {
        Cell::Dimension(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Nothing varied, just the average
    Scalar(f64),
    /// The values of the varying dimensions, in the order branch,
    /// key-max, threads, iterations, task; then the average
    Tuple {
        dimensions: Vec<DimensionValue>,
        average: f64,
    },
}

impl Row {
    /// Collapses to `Scalar` if `dimensions` is empty.
    pub fn new(dimensions: Vec<DimensionValue>, average: f64) -> Self {
        if dimensions.is_empty() {
            Row::Scalar(average)
        } else {
            Row::Tuple {
                dimensions,
                average,
            }
        }
    }

    pub fn average(&self) -> f64 {
        match self {
            Row::Scalar(average) => *average,
            Row::Tuple { average, .. } => *average,
        }
    }

    pub fn dimensions(&self) -> &[DimensionValue] {
        match self {
            Row::Scalar(_) => &[],
            Row::Tuple { dimensions, .. } => dimensions,
        }
    }

    pub fn cells(&self) -> Vec<Cell> {
        self.dimensions()
            .iter()
            .cloned()
            .map(Cell::Dimension)
            .chain(std::iter::once(Cell::Measurement(self.average())))
            .collect()
    }

    /// The cells separated by tabs.
    pub fn to_tsv_line(&self) -> String {
        self.cells().iter().join("\t")
    }
}

/// Serializes like the rows themselves: a bare number for `Scalar`,
/// otherwise an array of the cells.
impl serde::Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Row::Scalar(average) => serializer.serialize_f64(*average),
            Row::Tuple { .. } => serializer.collect_seq(self.cells()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ResultSet {
    /// The sweep had exactly one combination
    One(Row),
    Many(Vec<Row>),
}

impl ResultSet {
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        if rows.len() == 1 {
            if let Some(row) = rows.pop() {
                return ResultSet::One(row);
            }
        }
        ResultSet::Many(rows)
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            ResultSet::One(row) => std::slice::from_ref(row),
            ResultSet::Many(rows) => rows,
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ResultSet::One(row) => vec![row],
            ResultSet::Many(rows) => rows,
        }
    }
}
