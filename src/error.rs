//! Error type shared by the tensor backend, the solver and the dataset loader.

/// Errors produced while building tensors, fitting models or loading datasets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operand shapes disagree for the named operation.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    /// The training set has no rows, so the mean cost is undefined.
    #[error("training set is empty")]
    EmptyDataset,

    /// The divergence guard saw the cost rise (or stop being finite) after an update.
    #[error("gradient descent diverged at iteration {iteration}: cost went from {previous_cost} to {cost}")]
    Diverged {
        iteration: usize,
        previous_cost: f64,
        cost: f64,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field that is not a real number.
    #[error("data row {row}, column {column}: {value:?} is not a number")]
    Parse {
        row: usize,
        column: usize,
        value: String,
    },

    /// A record whose width differs from the first record.
    #[error("data row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
