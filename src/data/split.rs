/*!
Chronological train/validation/test splitting
*/
use super::Series;
use crate::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a series is cut into training, validation and test partitions.
///
/// Every form describes the *end* of the training and validation partitions; the test partition always runs to the
/// end of the series.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boundaries {
    /// Partition sizes as fractions of the series length, each in `(0, 1]`. Each size is floored on its own, so the
    /// training partition ends at `floor(train * len)` and the validation partition `floor(validation * len)` rows
    /// later.
    Sizes {
        /// The size of the training partition
        train: f64,
        /// The size of the validation partition
        validation: f64,
    },
    /// Cumulative fractions of the series length, each in `(0, 1]`. Resolved as `floor(fraction * len)`.
    Fractions {
        /// The fraction of the series preceding the validation partition
        train_end: f64,
        /// The fraction of the series preceding the test partition
        val_end: f64,
    },
    /// Explicit row indices
    Indices {
        /// The first row of the validation partition
        train_end: usize,
        /// The first row of the test partition
        val_end: usize,
    },
}

impl Default for Boundaries {
    fn default() -> Boundaries {
        Boundaries::from_sizes(0.7, 0.15)
    }
}

impl Boundaries {
    /// Build boundaries from partition sizes, e.g. `(0.7, 0.15)` for a 70/15/15 split.
    ///
    /// The test partition receives whatever is left; sizes leaving it empty are rejected on `resolve`.
    pub fn from_sizes(train: f64, validation: f64) -> Boundaries {
        Boundaries::Sizes { train, validation }
    }
    /// Resolve these boundaries to `(train_end, val_end)` row indices for a series of length `len`,
    /// checking every partition is non-empty
    pub fn resolve(&self, len: usize) -> Result<(usize, usize)> {
        let (train_end, val_end) = match *self {
            Boundaries::Sizes { train, validation } => {
                let train_rows = fraction_of(train, len)?;
                (train_rows, train_rows + fraction_of(validation, len)?)
            }
            Boundaries::Fractions { train_end, val_end } => {
                (fraction_of(train_end, len)?, fraction_of(val_end, len)?)
            }
            Boundaries::Indices { train_end, val_end } => (train_end, val_end),
        };
        if val_end < train_end {
            return Err(Error::InvalidBoundary(format!(
                "validation end {} precedes training end {}",
                val_end, train_end
            )));
        }
        if val_end > len {
            return Err(Error::InvalidBoundary(format!(
                "validation end {} is past the end of a series of length {}",
                val_end, len
            )));
        }
        if train_end == 0 || val_end == train_end || val_end == len {
            return Err(Error::InvalidBoundary(format!(
                "partitions [0, {}), [{}, {}), [{}, {}) must all be non-empty",
                train_end, train_end, val_end, val_end, len
            )));
        }
        Ok((train_end, val_end))
    }
}

/// `floor(fraction * len)`, for a fraction in `(0, 1]`
fn fraction_of(fraction: f64, len: usize) -> Result<usize> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(Error::InvalidBoundary(format!(
            "fraction {} is outside (0, 1]",
            fraction
        )));
    }
    Ok((fraction * len as f64).floor() as usize)
}

/// A series cut into three contiguous partitions
#[derive(Debug, Clone, PartialEq)]
pub struct Partitions<F = CpuFloat> {
    /// The earliest rows, used to fit the scaler
    pub train: Series<F>,
    /// The rows following the training partition
    pub validation: Series<F>,
    /// The latest rows
    pub test: Series<F>,
}

impl<F> Partitions<F> {
    /// Unpack into a `(train, validation, test)` tuple
    pub fn into_tuple(self) -> (Series<F>, Series<F>, Series<F>) {
        (self.train, self.validation, self.test)
    }
}

/// Split a series chronologically. Concatenating the partitions in order yields the input series.
pub fn split<F: Clone>(series: &Series<F>, boundaries: Boundaries) -> Result<Partitions<F>> {
    let len = series.len();
    let (train_end, val_end) = boundaries.resolve(len)?;
    debug!(len, train_end, val_end, "Splitting series");
    Ok(Partitions {
        train: series.slice(0..train_end),
        validation: series.slice(train_end..val_end),
        test: series.slice(val_end..len),
    })
}
