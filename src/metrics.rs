/*!
Forecast error metrics, computed in price scale
*/
use crate::*;
use serde::Serialize;

/// Error metrics of a set of predictions
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Mean absolute percentage error, in percent. Rows with a zero actual value are skipped.
    pub mape: f64,
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(Error::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    Ok(())
}

/// Compare predictions against actual values
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<Metrics> {
    check_lengths(actual, predicted)?;
    let n = actual.len() as f64;
    let mut squared = 0.0;
    let mut absolute = 0.0;
    let mut percentage = 0.0;
    let mut nonzero = 0usize;
    for (&a, &p) in actual.iter().zip(predicted) {
        let err = a - p;
        squared += err * err;
        absolute += err.abs();
        if a != 0.0 {
            percentage += (err / a).abs();
            nonzero += 1;
        }
    }
    let mse = squared / n;
    Ok(Metrics {
        mse,
        rmse: mse.sqrt(),
        mae: absolute / n,
        mape: if nonzero == 0 {
            f64::NAN
        } else {
            100.0 * percentage / nonzero as f64
        },
    })
}

/// The fraction of predictions within `threshold` of the actual value, relative to its magnitude
pub fn within_tolerance(actual: &[f64], predicted: &[f64], threshold: f64) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let hits = actual
        .iter()
        .zip(predicted)
        .filter(|&(&a, &p)| (p - a).abs() <= threshold * a.abs())
        .count();
    Ok(hits as f64 / actual.len() as f64)
}
