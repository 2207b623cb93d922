/*!
Technical indicators: enrich raw bars into the feature table the forecasting models are trained on
*/
use super::{Bar, Record, Series};
use crate::*;
use serde::{Deserialize, Serialize};
use ta::indicators::{ExponentialMovingAverage, FastStochastic, SimpleMovingAverage};
use ta::{Close, Next};
use tracing::debug;

/// The name of the target column: the closing price `horizon` bars ahead
pub const FUTURE_CLOSE: &str = "future_close";

/// Indicator periods
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// The span of the long exponential moving average of the close
    pub ma_span: usize,
    /// The fast and slow spans of the short-term EMA difference
    pub short_spans: (usize, usize),
    /// The fast and slow spans of the long-term EMA difference
    pub long_spans: (usize, usize),
    /// The lookback of the stochastic oscillator's `%K` line
    pub stochastic_period: usize,
    /// The smoothing period of the stochastic oscillator's `%D` line
    pub stochastic_smoothing: usize,
    /// The averaging period of the RSI
    pub rsi_period: usize,
    /// How many bars ahead the target closing price is taken
    pub horizon: usize,
}

impl Default for IndicatorConfig {
    fn default() -> IndicatorConfig {
        IndicatorConfig {
            ma_span: 200,
            short_spans: (12, 26),
            long_spans: (50, 200),
            stochastic_period: 14,
            stochastic_smoothing: 3,
            rsi_period: 14,
            horizon: 1,
        }
    }
}

impl IndicatorConfig {
    /// The names of the columns `enrich` produces, in order. The target column comes last.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Bar::COLUMNS.iter().map(|&c| c.to_owned()).collect();
        columns.push(format!("MA_{}", self.ma_span));
        columns.push(format!("EMA_{}-{}", self.short_spans.0, self.short_spans.1));
        columns.push(format!("EMA_{}-{}", self.long_spans.0, self.long_spans.1));
        columns.push("%K".to_owned());
        columns.push("%D".to_owned());
        columns.push("RSI".to_owned());
        columns.push(FUTURE_CLOSE.to_owned());
        columns
    }
    /// The number of leading bars dropped because the stochastic oscillator is not yet defined on them
    pub fn warm_up(&self) -> usize {
        self.stochastic_period.saturating_sub(1) + self.stochastic_smoothing.saturating_sub(1)
    }
}

fn ema(span: usize) -> Result<ExponentialMovingAverage> {
    ExponentialMovingAverage::new(span).map_err(|err| Error::Indicator(format!("EMA({}): {:?}", span, err)))
}

fn sma(period: usize) -> Result<SimpleMovingAverage> {
    SimpleMovingAverage::new(period).map_err(|err| Error::Indicator(format!("SMA({}): {:?}", period, err)))
}

/// Relative strength index over rolling means of gains and losses.
///
/// The means accept fewer than `period` samples at the start of the series, and the first bar has no change.
#[derive(Debug, Clone)]
struct RollingRsi {
    gains: SimpleMovingAverage,
    losses: SimpleMovingAverage,
    prev: Option<f64>,
}

impl RollingRsi {
    fn new(period: usize) -> Result<RollingRsi> {
        Ok(RollingRsi {
            gains: sma(period)?,
            losses: sma(period)?,
            prev: None,
        })
    }
}

impl Next<f64> for RollingRsi {
    type Output = f64;
    fn next(&mut self, close: f64) -> f64 {
        let delta = self.prev.map(|prev| close - prev).unwrap_or(0.0);
        self.prev = Some(close);
        let gain = self.gains.next(delta.max(0.0));
        let loss = self.losses.next((-delta).max(0.0));
        if loss == 0.0 {
            return if gain == 0.0 { 50.0 } else { 100.0 };
        }
        100.0 - 100.0 / (1.0 + gain / loss)
    }
}

/// Enrich bars with moving averages, the stochastic oscillator, RSI and the `future_close` target.
///
/// Leading bars on which `%K` or `%D` are undefined and trailing bars with no future close are dropped.
pub fn enrich(bars: &[Bar], config: &IndicatorConfig) -> Result<Series> {
    let mut ma = ema(config.ma_span)?;
    let mut short = (ema(config.short_spans.0)?, ema(config.short_spans.1)?);
    let mut long = (ema(config.long_spans.0)?, ema(config.long_spans.1)?);
    let mut k_line = FastStochastic::new(config.stochastic_period)
        .map_err(|err| Error::Indicator(format!("stochastic({}): {:?}", config.stochastic_period, err)))?;
    let mut d_line = sma(config.stochastic_smoothing)?;
    let mut rsi = RollingRsi::new(config.rsi_period)?;

    let start = config.warm_up();
    let end = bars.len().saturating_sub(config.horizon);
    if start >= end {
        return Err(Error::InsufficientLength {
            len: bars.len(),
            lookback: start + config.horizon,
        });
    }

    let mut series = Series::new(config.columns());
    for (i, bar) in bars[..end].iter().enumerate() {
        let close = bar.close();
        let ma = ma.next(close);
        let short = short.0.next(close) - short.1.next(close);
        let long = long.0.next(close) - long.1.next(close);
        let k = k_line.next(bar);
        let d = d_line.next(k);
        let rsi = rsi.next(close);
        if i < start {
            continue;
        }
        let mut values = bar.values().to_vec();
        values.extend_from_slice(&[ma, short, long, k, d, rsi, bars[i + config.horizon].c]);
        series.push(Record::new(Some(bar.t), values))?;
    }
    debug!(bars = bars.len(), rows = series.len(), "Enriched bars");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                t: t0 + Duration::minutes(15 * i as i64),
                o: c,
                h: c + 1.0,
                l: c - 1.0,
                c,
                v: 100.0,
            })
            .collect()
    }

    #[test]
    fn columns_match_the_gold_feature_set() {
        let columns = IndicatorConfig::default().columns();
        assert_eq!(
            columns,
            vec![
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
                "future_close"
            ]
        );
        assert_eq!(IndicatorConfig::default().warm_up(), 15);
    }

    #[test]
    fn rows_are_trimmed_and_target_looks_ahead() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let series = enrich(&bars(&closes), &IndicatorConfig::default()).unwrap();
        // 15 warm-up rows and 1 row without a future close
        assert_eq!(series.len(), 24);
        let first = &series.records()[0];
        assert_eq!(first.values[3], 115.0);
        assert_eq!(first.values[11], 116.0);
        // A steady rise has no losses
        assert_eq!(series.column("RSI").unwrap().last(), Some(100.0));
        // The close sits one below the 14-bar high
        let k = series.column("%K").unwrap().last().unwrap();
        assert!((k - 100.0 * 14.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn ema_follows_pandas_adjust_false() {
        let config = IndicatorConfig {
            ma_span: 3,
            stochastic_period: 1,
            stochastic_smoothing: 1,
            ..IndicatorConfig::default()
        };
        let series = enrich(&bars(&[1.0, 2.0, 3.0, 4.0]), &config).unwrap();
        // alpha = 2 / (3 + 1) = 0.5: 1, 1.5, 2.25
        let ma: Vec<f64> = series.column("MA_3").unwrap().collect();
        assert_eq!(ma, vec![1.0, 1.5, 2.25]);
    }

    #[test]
    fn rsi_uses_rolling_means() {
        let mut rsi = RollingRsi::new(2).unwrap();
        assert_eq!(rsi.next(10.0), 50.0);
        assert_eq!(rsi.next(12.0), 100.0);
        // gains (0 + 2) / 2 = 1 then (2 + 0) / 2 = 1, losses (0 + 0) / 2 then (0 + 1) / 2 = 0.5
        let value = rsi.next(11.0);
        assert!((value - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn short_input_fails() {
        assert!(matches!(
            enrich(&bars(&[1.0; 16]), &IndicatorConfig::default()),
            Err(Error::InsufficientLength { len: 16, .. })
        ));
    }
}
