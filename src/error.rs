/*!
The error type shared by every fallible operation in `goldscale`
*/
use thiserror::Error;

/// A `Result` specialised to the `goldscale` error type
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while loading, splitting, scaling or windowing a series
#[derive(Debug, Error)]
pub enum Error {
    /// A split request would produce an empty or out-of-order partition
    #[error("invalid partition boundary: {0}")]
    InvalidBoundary(String),
    /// A column has zero range over the training partition, so it cannot be min/max scaled
    #[error("column `{0}` has no spread in the training partition (max == min)")]
    DegenerateFeature(String),
    /// A series is too short for the requested lookback
    #[error("series of length {len} is too short for a lookback of {lookback}")]
    InsufficientLength {
        /// The length of the offending series
        len: usize,
        /// The requested lookback
        lookback: usize,
    },
    /// A window of zero steps was requested
    #[error("lookback must be at least one step")]
    ZeroLookback,
    /// A named column is absent from a series
    #[error("column `{0}` not found")]
    MissingColumn(String),
    /// Two series which should share a schema do not
    #[error("column mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        /// The columns of the first series
        expected: Vec<String>,
        /// The columns of the mismatched series
        found: Vec<String>,
    },
    /// A record does not carry one value per column
    #[error("record {row} has {found} values, expected {expected}")]
    RecordWidth {
        /// The index of the offending record
        row: usize,
        /// The number of columns in the series
        expected: usize,
        /// The number of values in the record
        found: usize,
    },
    /// A CSV cell could not be parsed into a finite number or timestamp
    #[error("row {row}, column `{column}`: cannot parse {value:?}")]
    Parse {
        /// The (zero-based) data row, not counting the header
        row: usize,
        /// The column name
        column: String,
        /// The raw cell contents
        value: String,
    },
    /// Actual and predicted values cannot be compared
    #[error("cannot compare {actual} actual values with {predicted} predictions")]
    LengthMismatch {
        /// The number of actual values
        actual: usize,
        /// The number of predicted values
        predicted: usize,
    },
    /// A technical indicator was configured with an invalid period
    #[error("invalid indicator parameter: {0}")]
    Indicator(String),
    /// CSV reading or writing failed
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Underlying IO failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A configuration file could not be deserialized
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}
