use ndarray::{Array2, ArrayView1};
use thiserror::Error;

/// Column order the delivery model was fitted on
pub const FEATURE_NAMES: [&str; 8] = [
    "NO_OF_ITEMS",
    "EXPECTED_DELIVERY_DAYS",
    "DISTANCE_KM",
    "NUM_WEEKENDS",
    "NUM_HOLIDAYS",
    "TYPE_OF_ITEM_EXPRESS DOCUMENTS",
    "TYPE_OF_ITEM_OTHERS",
    "TYPE_OF_ITEM_PACKAGES AND PARCELS",
];

/// Errors raised while assembling a feature table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("All arrays must be of the same length: column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Column '{0}' is empty")]
    EmptyColumn(String),
    #[error("Batch has no rows")]
    EmptyBatch,
    #[error("Column '{column}' row {row}: could not convert '{value}' to float")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

/// Fixed-column table handed to a model, one row per shipment
#[derive(Clone, Debug)]
pub struct FeatureTable {
    values: Array2<f64>,
}

impl FeatureTable {
    /// Build a table from named columns.
    ///
    /// Each entry is either a full column or a scalar that gets repeated on
    /// every row. The row count is taken from the first full column; a table
    /// made only of scalars has a single row. A table with no rows is
    /// rejected.
    pub fn from_columns(columns: &[(&str, Column)]) -> Result<Self, FeatureError> {
        let n_rows = columns
            .iter()
            .find_map(|(_, col)| match col {
                Column::Values(values) => Some(values.len()),
                Column::Broadcast(_) => None,
            })
            .unwrap_or(1);
        if n_rows == 0 {
            return Err(FeatureError::EmptyBatch);
        }

        let mut values = Array2::zeros((n_rows, columns.len()));

        for (j, (name, column)) in columns.iter().enumerate() {
            match column {
                Column::Values(cells) => {
                    if cells.len() != n_rows {
                        return Err(FeatureError::LengthMismatch {
                            column: name.to_string(),
                            expected: n_rows,
                            actual: cells.len(),
                        });
                    }
                    for (i, cell) in cells.iter().enumerate() {
                        values[[i, j]] = *cell;
                    }
                }
                Column::Broadcast(value) => values.column_mut(j).fill(*value),
            }
        }

        Ok(Self { values })
    }

    /// Wrap an existing matrix laid out in `FEATURE_NAMES` order
    pub fn from_array(values: Array2<f64>) -> Self {
        Self { values }
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }
}

/// One column of a table under construction
#[derive(Clone, Debug)]
pub enum Column {
    Values(Vec<f64>),
    Broadcast(f64),
}
