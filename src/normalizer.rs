/*!
The time series normalizer: split a series chronologically, fit a min/max scaler on the training partition, and apply
that one scaler to every partition
*/
use crate::config::NormalizerConfig;
use crate::data::{
    scale::{FeatureScaler, ScaleMode, ScaledSeries},
    split::{split, Boundaries, Partitions},
    window::{window, Windows},
    Series,
};
use crate::*;
use num::Float;
use std::fmt::Debug;

/// Splits and scales series for a fixed choice of columns, boundaries and scaling mode.
///
/// The normalizer itself holds no fitted state: `fit` returns a fresh scaler, which callers pass to `transform`
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesNormalizer {
    /// The feature columns, in model input order
    pub features: Vec<String>,
    /// The target column
    pub target: String,
    /// Which interval to scale onto
    pub mode: ScaleMode,
    /// Where to cut the series
    pub boundaries: Boundaries,
}

/// The output of a full normalization run
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared<F = CpuFloat> {
    /// The scaled training partition
    pub train: ScaledSeries<F>,
    /// The scaled validation partition
    pub validation: ScaledSeries<F>,
    /// The scaled test partition
    pub test: ScaledSeries<F>,
    /// The scaler fitted on the training partition, needed to map predictions back to price scale
    pub scaler: FeatureScaler<F>,
}

impl TimeSeriesNormalizer {
    /// Create a new normalizer
    pub fn new<S: Into<String>>(
        features: impl IntoIterator<Item = S>,
        target: impl Into<String>,
        mode: ScaleMode,
        boundaries: Boundaries,
    ) -> TimeSeriesNormalizer {
        TimeSeriesNormalizer {
            features: features.into_iter().map(Into::into).collect(),
            target: target.into(),
            mode,
            boundaries,
        }
    }
    /// Create a normalizer from a run configuration
    pub fn from_config(config: &NormalizerConfig) -> TimeSeriesNormalizer {
        TimeSeriesNormalizer {
            features: config.features.clone(),
            target: config.target.clone(),
            mode: config.mode,
            boundaries: config.boundaries,
        }
    }
    /// Split a series into training, validation and test partitions
    pub fn split<F: Clone>(&self, series: &Series<F>) -> Result<Partitions<F>> {
        split(series, self.boundaries)
    }
    /// Fit a scaler on a training partition
    pub fn fit<F: Float + Debug>(&self, train: &Series<F>) -> Result<FeatureScaler<F>> {
        FeatureScaler::fit(train, &self.features[..], &self.target, self.mode)
    }
    /// Scale a partition with a previously fitted scaler
    pub fn transform<F: Float + Debug>(
        &self,
        partition: &Series<F>,
        scaler: &FeatureScaler<F>,
    ) -> Result<ScaledSeries<F>> {
        scaler.transform(partition)
    }
    /// Split a series, fit a scaler on its training partition, and scale all three partitions with it
    pub fn prepare<F: Float + Debug>(&self, series: &Series<F>) -> Result<Prepared<F>> {
        let Partitions {
            train,
            validation,
            test,
        } = self.split(series)?;
        let scaler = self.fit(&train)?;
        Ok(Prepared {
            train: self.transform(&train, &scaler)?,
            validation: self.transform(&validation, &scaler)?,
            test: self.transform(&test, &scaler)?,
            scaler,
        })
    }
}

impl<F> Prepared<F> {
    /// Lookback windows over the scaled target of each partition, as `(train, validation, test)`
    pub fn target_windows(
        &self,
        lookback: usize,
    ) -> Result<(Windows<'_, F>, Windows<'_, F>, Windows<'_, F>)> {
        Ok((
            window(&self.train.targets, lookback)?,
            window(&self.validation.targets, lookback)?,
            window(&self.test.targets, lookback)?,
        ))
    }
}
