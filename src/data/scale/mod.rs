/*!
Input data scaling
*/
use super::Series;
use crate::{util::min_max, CpuFloat, Error, Result};
use chrono::NaiveDateTime;
use num::Float;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

/// The target interval of min/max scaling
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Map `[min, max]` onto `[0, 1]`
    ZeroOne,
    /// Map `[min, max]` onto `[-1, 1]`
    Symmetric,
}

impl Default for ScaleMode {
    fn default() -> ScaleMode {
        ScaleMode::Symmetric
    }
}

/// Scale a value given the fitted range of its column.
///
/// Values outside `[min, max]` are extrapolated, not clipped.
#[inline]
pub fn transform_value<F: Float>(value: F, min: F, max: F, mode: ScaleMode) -> F {
    let unit = (value - min) / (max - min);
    match mode {
        ScaleMode::ZeroOne => unit,
        ScaleMode::Symmetric => unit + unit - F::one(),
    }
}

/// Undo `transform_value`
#[inline]
pub fn inverse_value<F: Float>(value: F, min: F, max: F, mode: ScaleMode) -> F {
    match mode {
        ScaleMode::ZeroOne => value * (max - min) + min,
        ScaleMode::Symmetric => (value + F::one()) * (max - min) / (F::one() + F::one()) + min,
    }
}

/// Map scaled values back to the original scale of a column fitted to `[min, max]`
pub fn inverse_transform<F: Float>(scaled: &[F], min: F, max: F, mode: ScaleMode) -> Vec<F> {
    scaled
        .iter()
        .map(|&value| inverse_value(value, min, max, mode))
        .collect()
}

/// The range of a column over the training partition
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MinMax<F = CpuFloat> {
    /// The smallest training value
    pub min: F,
    /// The largest training value
    pub max: F,
}

impl<F: Float> MinMax<F> {
    /// Compute the range of a column, failing if it is empty or constant
    pub fn fit<I: IntoIterator<Item = F>>(name: &str, values: I) -> Result<MinMax<F>> {
        match min_max(values) {
            Some((min, max)) if max > min => Ok(MinMax { min, max }),
            _ => Err(Error::DegenerateFeature(name.to_owned())),
        }
    }
    /// Scale a value into this range
    #[inline]
    pub fn scale(&self, value: F, mode: ScaleMode) -> F {
        transform_value(value, self.min, self.max, mode)
    }
    /// Map a scaled value back to the original scale
    #[inline]
    pub fn unscale(&self, value: F, mode: ScaleMode) -> F {
        inverse_value(value, self.min, self.max, mode)
    }
    /// Whether a value lies outside the fitted range
    #[inline]
    pub fn contains(&self, value: F) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-column min/max ranges fitted on a training partition.
///
/// There is deliberately no way to modify a fitted scaler: validation and test data are transformed with the ranges
/// of the training data and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler<F = CpuFloat> {
    mode: ScaleMode,
    features: Vec<(String, MinMax<F>)>,
    target: (String, MinMax<F>),
}

/// A partition after scaling: one row of feature values per record, and the target column
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledSeries<F = CpuFloat> {
    /// The timestamps of the source records
    pub timestamps: Vec<Option<NaiveDateTime>>,
    /// Scaled feature values, one row per record in the order the scaler's features were named
    pub inputs: Vec<Vec<F>>,
    /// The scaled target column
    pub targets: Vec<F>,
}

impl<F: Float + Debug> FeatureScaler<F> {
    /// Fit a scaler on a training partition
    pub fn fit<S: AsRef<str>>(
        train: &Series<F>,
        features: &[S],
        target: &str,
        mode: ScaleMode,
    ) -> Result<FeatureScaler<F>> {
        let fit_column = |name: &str| -> Result<(String, MinMax<F>)> {
            let range = MinMax::fit(name, train.column(name)?)?;
            debug!(column = name, min = ?range.min, max = ?range.max, "Fitted column range");
            Ok((name.to_owned(), range))
        };
        let features = features
            .iter()
            .map(|name| fit_column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let target = fit_column(target)?;
        Ok(FeatureScaler {
            mode,
            features,
            target,
        })
    }
    /// The scaling mode of this scaler
    #[inline]
    pub fn mode(&self) -> ScaleMode {
        self.mode
    }
    /// The fitted feature columns and their ranges, in input order
    #[inline]
    pub fn features(&self) -> &[(String, MinMax<F>)] {
        &self.features
    }
    /// Get the fitted range of a feature column
    pub fn feature_range(&self, name: &str) -> Option<MinMax<F>> {
        self.features
            .iter()
            .find(|(feature, _)| feature == name)
            .map(|(_, range)| *range)
    }
    /// The name of the target column
    #[inline]
    pub fn target_name(&self) -> &str {
        &self.target.0
    }
    /// The fitted range of the target column
    #[inline]
    pub fn target_range(&self) -> MinMax<F> {
        self.target.1
    }
    /// Scale a partition. Every partition of a run should be scaled by the same scaler.
    pub fn transform(&self, partition: &Series<F>) -> Result<ScaledSeries<F>> {
        let feature_ix = self
            .features
            .iter()
            .map(|(name, _)| partition.column_index(name))
            .collect::<Result<Vec<_>>>()?;
        let target_ix = partition.column_index(&self.target.0)?;
        let mut out_of_range = 0usize;
        let mut scaled = ScaledSeries {
            timestamps: Vec::with_capacity(partition.len()),
            inputs: Vec::with_capacity(partition.len()),
            targets: Vec::with_capacity(partition.len()),
        };
        for record in partition.records() {
            let row = feature_ix
                .iter()
                .zip(self.features.iter())
                .map(|(&ix, (_, range))| {
                    let value = record.values[ix];
                    if !range.contains(value) {
                        out_of_range += 1;
                    }
                    range.scale(value, self.mode)
                })
                .collect();
            let target = record.values[target_ix];
            if !self.target.1.contains(target) {
                out_of_range += 1;
            }
            scaled.timestamps.push(record.t);
            scaled.inputs.push(row);
            scaled.targets.push(self.target.1.scale(target, self.mode));
        }
        if out_of_range > 0 {
            warn!(
                out_of_range,
                rows = partition.len(),
                "Values outside the fitted range were extrapolated"
            );
        }
        Ok(scaled)
    }
    /// Map scaled target values (e.g. model predictions) back to price scale
    pub fn inverse_target(&self, scaled: &[F]) -> Vec<F> {
        let MinMax { min, max } = self.target.1;
        inverse_transform(scaled, min, max, self.mode)
    }
}

impl<F> ScaledSeries<F> {
    /// The number of rows in this partition
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }
    /// Whether this partition is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
    /// The number of feature columns per row
    #[inline]
    pub fn features(&self) -> usize {
        self.inputs.first().map(Vec::len).unwrap_or(0)
    }
    /// Lookback windows over the scaled target column, for univariate sequence models
    pub fn target_windows(&self, lookback: usize) -> Result<super::window::Windows<'_, F>> {
        super::window::window(&self.targets, lookback)
    }
    /// Every run of `lookback` consecutive feature rows, paired with the target of the last row in the run.
    ///
    /// Unlike `target_windows`, the target here is not one step past the window: the target column already looks
    /// ahead, so the last row of a run carries its own label.
    pub fn sequences(
        &self,
        lookback: usize,
    ) -> Result<impl ExactSizeIterator<Item = (&[Vec<F>], &F)> + Clone + '_> {
        if lookback == 0 {
            return Err(Error::ZeroLookback);
        }
        if self.len() < lookback {
            return Err(Error::InsufficientLength {
                len: self.len(),
                lookback,
            });
        }
        Ok((lookback - 1..self.len())
            .map(move |end| (&self.inputs[end + 1 - lookback..=end], &self.targets[end])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{tests::ramp, Record};

    fn train_series(rows: &[[f64; 3]]) -> Series {
        let records = rows
            .iter()
            .map(|row| Record::new(None, row.to_vec()))
            .collect();
        Series::from_records(vec!["Open", "Close", "future_close"], records).unwrap()
    }

    #[test]
    fn endpoints_are_exact() {
        let range = MinMax {
            min: 1187.3,
            max: 2671.9,
        };
        assert_eq!(range.scale(1187.3, ScaleMode::Symmetric), -1.0);
        assert_eq!(range.scale(2671.9, ScaleMode::Symmetric), 1.0);
        assert_eq!(range.scale(1187.3, ScaleMode::ZeroOne), 0.0);
        assert_eq!(range.scale(2671.9, ScaleMode::ZeroOne), 1.0);
    }

    #[test]
    fn out_of_range_values_extrapolate() {
        let range = MinMax {
            min: 10.0,
            max: 20.0,
        };
        assert_eq!(range.scale(30.0, ScaleMode::ZeroOne), 2.0);
        assert_eq!(range.scale(30.0, ScaleMode::Symmetric), 3.0);
        assert_eq!(range.scale(0.0, ScaleMode::Symmetric), -3.0);
        for &mode in &[ScaleMode::ZeroOne, ScaleMode::Symmetric] {
            for &x in &[-1e4, -3.5, 0.0, 10.0, 14.2, 20.0, 33.3, 2671.9] {
                let back = range.unscale(range.scale(x, mode), mode);
                assert!((back - x).abs() < 1e-6, "{} != {} in {:?}", back, x, mode);
            }
        }
    }

    #[test]
    fn constant_columns_are_degenerate() {
        let train = train_series(&[[1.0, 5.0, 6.0], [2.0, 5.0, 7.0]]);
        match FeatureScaler::fit(&train, &["Open", "Close"], "future_close", ScaleMode::ZeroOne) {
            Err(Error::DegenerateFeature(name)) => assert_eq!(name, "Close"),
            other => panic!("Expected a degenerate feature, got {:?}", other),
        }
        let constant_target = train_series(&[[1.0, 5.0, 6.0], [2.0, 4.0, 6.0]]);
        assert!(matches!(
            FeatureScaler::fit(&constant_target, &["Open"], "future_close", ScaleMode::ZeroOne),
            Err(Error::DegenerateFeature(_))
        ));
        assert!(matches!(
            FeatureScaler::fit(&train, &["RSI"], "future_close", ScaleMode::ZeroOne),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn ranges_come_from_the_fitted_partition_only() {
        let a = train_series(&[[1.0, 2.0, 3.0], [2.0, 4.0, 5.0], [3.0, 3.0, 4.0]]);
        let b = train_series(&[[0.5, 2.5, 9.0]]);
        let a_and_b = Series::concat(vec![&a, &b]).unwrap();
        let features = ["Open", "Close"];
        let fit_a = FeatureScaler::fit(&a, &features, "future_close", ScaleMode::Symmetric).unwrap();
        let fit_ab =
            FeatureScaler::fit(&a_and_b, &features, "future_close", ScaleMode::Symmetric).unwrap();
        assert_ne!(fit_a, fit_ab);
        assert_eq!(fit_a.feature_range("Open"), Some(MinMax { min: 1.0, max: 3.0 }));
        assert_eq!(fit_ab.feature_range("Open"), Some(MinMax { min: 0.5, max: 3.0 }));
        assert_eq!(fit_a.target_range(), MinMax { min: 3.0, max: 5.0 });
        assert_eq!(fit_ab.target_range(), MinMax { min: 3.0, max: 9.0 });
        // Close is unchanged by b, so its range is too
        assert_eq!(fit_a.feature_range("Close"), fit_ab.feature_range("Close"));

        // Transforming b with the scaler fitted on a does not touch the scaler
        let before = fit_a.clone();
        let scaled_b = fit_a.transform(&b).unwrap();
        assert_eq!(fit_a, before);
        assert_eq!(scaled_b.inputs, vec![vec![-1.5, -0.5]]);
        assert_eq!(scaled_b.targets, vec![5.0]);
        assert_eq!(fit_a.inverse_target(&scaled_b.targets), vec![9.0]);
    }

    #[test]
    fn transform_selects_named_columns() {
        let series = ramp(5);
        let scaler = FeatureScaler::fit(&series, &["y"], "x", ScaleMode::ZeroOne).unwrap();
        assert_eq!(scaler.target_name(), "x");
        let scaled = scaler.transform(&series).unwrap();
        assert_eq!(scaled.features(), 1);
        assert_eq!(scaled.targets, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(scaled.inputs[2], vec![0.5]);
        let missing = Series::<f64>::new(vec!["y"]);
        assert!(matches!(
            scaler.transform(&missing),
            Err(Error::MissingColumn(ref name)) if name == "x"
        ));
    }

    #[test]
    fn sequences_pair_rows_with_their_own_target() {
        let series = ramp(5);
        let scaler = FeatureScaler::fit(&series, &["x", "y"], "y", ScaleMode::ZeroOne).unwrap();
        let scaled = scaler.transform(&series).unwrap();
        let sequences: Vec<_> = scaled.sequences(2).unwrap().collect();
        assert_eq!(sequences.len(), 4);
        assert_eq!(sequences[0].0, &scaled.inputs[0..2]);
        assert_eq!(*sequences[0].1, scaled.targets[1]);
        assert_eq!(*sequences[3].1, 1.0);
        assert_eq!(scaled.sequences(5).unwrap().len(), 1);
        assert!(matches!(
            scaled.sequences(6),
            Err(Error::InsufficientLength { len: 5, lookback: 6 })
        ));
        assert_eq!(scaled.target_windows(3).unwrap().len(), 1);
    }
}
