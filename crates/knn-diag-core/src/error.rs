use thiserror::Error;

/// Error type shared by every stage of the classification pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KnnError {
    #[error("Invalid format for {path}: expected a .csv file, got {extension:?}")]
    Format { path: String, extension: String },

    #[error("Cannot parse {value:?} as an integer in {path} at row {row}, column {col}")]
    Parse {
        path: String,
        row: usize,
        col: usize,
        value: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Column {column} has zero standard deviation")]
    DegenerateColumn { column: usize },

    #[error("Invalid k: {k} (must be between 1 and {n_train})")]
    InvalidK { k: usize, n_train: usize },

    #[error("Length mismatch: expected {expected} labels, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Standardization needs at least 2 rows, got {got}")]
    InsufficientSamples { got: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("{0} used before fit()")]
    NotFitted(&'static str),

    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type KnnResult<T> = Result<T, KnnError>;
