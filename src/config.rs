/*!
Run configuration: which columns to scale, how to split, and how to read the input
*/
use crate::data::{
    indicators::{IndicatorConfig, FUTURE_CLOSE},
    loader::CsvOptions,
    scale::ScaleMode,
    split::Boundaries,
};
use crate::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The feature columns of the gold price datasets
pub const GOLD_FEATURES: [&str; 11] = [
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "MA_200",
    "EMA_12-26",
    "EMA_50-200",
    "%K",
    "%D",
    "RSI",
];

/// Everything a normalization run needs to know, usually deserialized from TOML.
///
/// Missing keys take their defaults, which reproduce the gold forecasting setup: the eleven OHLCV and indicator
/// features, a `future_close` target, a 70/15/15 split and symmetric scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// The feature columns to scale, in model input order
    pub features: Vec<String>,
    /// The target column
    pub target: String,
    /// Where to cut the series
    pub boundaries: Boundaries,
    /// Which interval to scale onto
    pub mode: ScaleMode,
    /// How many consecutive rows make up one model input
    pub lookback: usize,
    /// How the input CSV is laid out
    pub csv: CsvOptions,
    /// Indicator periods, when enriching raw bars
    pub indicators: IndicatorConfig,
}

impl Default for NormalizerConfig {
    fn default() -> NormalizerConfig {
        NormalizerConfig {
            features: GOLD_FEATURES.iter().map(|&f| f.to_owned()).collect(),
            target: FUTURE_CLOSE.to_owned(),
            boundaries: Boundaries::default(),
            mode: ScaleMode::default(),
            lookback: 1,
            csv: CsvOptions::default(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl NormalizerConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(toml: &str) -> Result<NormalizerConfig> {
        Ok(toml::from_str(toml)?)
    }
    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<NormalizerConfig> {
        let text = std::fs::read_to_string(path)?;
        NormalizerConfig::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_the_gold_setup() {
        let config = NormalizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, NormalizerConfig::default());
        assert_eq!(config.features.len(), 11);
        assert_eq!(config.target, "future_close");
        assert_eq!(config.boundaries.resolve(100).unwrap(), (70, 85));
        // The default feature names are exactly what the indicators produce
        let columns = config.indicators.columns();
        assert_eq!(&columns[..11], &config.features[..]);
        assert_eq!(columns[11], config.target);
    }

    #[test]
    fn expanding_window_script_settings() {
        let config = NormalizerConfig::from_toml_str(
            r#"
            features = ["Open", "Close"]
            mode = "zero_one"
            lookback = 3

            [boundaries]
            kind = "fractions"
            train_end = 0.3
            val_end = 0.7

            [csv]
            delimiter = 59
            "#,
        )
        .unwrap();
        assert_eq!(config.features, vec!["Open", "Close"]);
        assert_eq!(config.mode, ScaleMode::ZeroOne);
        assert_eq!(config.lookback, 3);
        assert_eq!(config.boundaries.resolve(10).unwrap(), (3, 7));
        assert_eq!(config.csv.delimiter, b';');
        assert_eq!(config.csv.time_column.as_deref(), Some("Date"));
        assert_eq!(config.target, "future_close");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(
            NormalizerConfig::from_toml_str("mode = \"sideways\""),
            Err(Error::Config(_))
        ));
    }
}
