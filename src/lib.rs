/*!
Chronological train/validation/test splitting and leakage-free min/max scaling of price series, written in Rust.

Designed around gold price data (OHLCV bars enriched with moving averages, a stochastic oscillator and RSI, predicting
a `future_close` column), but applicable to any ordered numeric table. The scaler is fitted on the training partition
only and applied unchanged to validation and test, so evaluation statistics never leak into training.

A typical run:
```no_run
use goldscale::{config::NormalizerConfig, data::loader::read_series, normalizer::TimeSeriesNormalizer};
# fn main() -> goldscale::Result<()> {
let config = NormalizerConfig::load("gold.toml")?;
let series = read_series(std::fs::File::open("gold.csv")?, &config.csv)?;
let prepared = TimeSeriesNormalizer::from_config(&config).prepare(&series)?;
let prices = prepared.scaler.inverse_target(&prepared.test.targets);
# let _ = prices;
# Ok(())
# }
```
*/
#![forbid(missing_docs)]

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod normalizer;
pub mod util;

#[cfg(feature = "torch")]
pub mod forecast;
#[cfg(feature = "torch")]
pub mod tensor;

pub use error::{Error, Result};

/// The floating point type to be used for CPU calculations
pub type CpuFloat = f64;

/// The floating point type to be used for GPU calculations
pub type GpuFloat = f32;
