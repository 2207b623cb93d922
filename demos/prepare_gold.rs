/*!
Load (or generate) gold bars, enrich them with indicators, and normalize them for training.

Usage: `cargo run --example prepare_gold -- [BARS.csv] [CONFIG.toml]`
*/
use anyhow::Context;
use goldscale::config::NormalizerConfig;
use goldscale::data::{fake::gold_walk, indicators::enrich, loader::read_bars, Bar};
use goldscale::metrics::evaluate;
use goldscale::normalizer::TimeSeriesNormalizer;
use std::fs::File;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FAKE_BARS: usize = 20_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let bars_path = args.next();
    let config = match args.next() {
        Some(path) => NormalizerConfig::load(&path).with_context(|| format!("loading config {}", path))?,
        None => NormalizerConfig::default(),
    };

    let bars: Vec<Bar> = match &bars_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path))?;
            read_bars(file, &config.csv).with_context(|| format!("reading bars from {}", path))?
        }
        None => {
            warn!(bars = FAKE_BARS, "No input file given, generating a random walk");
            gold_walk(2004).take(FAKE_BARS).collect()
        }
    };
    info!(bars = bars.len(), "Loaded bars");

    let series = enrich(&bars, &config.indicators)?;
    let normalizer = TimeSeriesNormalizer::from_config(&config);
    let prepared = normalizer.prepare(&series)?;
    info!(
        train = prepared.train.len(),
        validation = prepared.validation.len(),
        test = prepared.test.len(),
        mode = ?prepared.scaler.mode(),
        "Normalized series"
    );
    for (name, range) in prepared.scaler.features() {
        info!(feature = %name, min = range.min, max = range.max, "Feature range");
    }
    let target = prepared.scaler.target_range();
    info!(target = %prepared.scaler.target_name(), min = target.min, max = target.max, "Target range");

    let sequences = prepared.test.sequences(config.lookback)?.len();
    info!(lookback = config.lookback, sequences, "Test sequences ready");

    // Baseline: tomorrow's close is today's close
    let features = prepared.scaler.features();
    if let Some(ix) = features.iter().position(|(name, _)| name == "Close") {
        let close = features[ix].1;
        let predicted: Vec<f64> = prepared
            .test
            .inputs
            .iter()
            .map(|row| close.unscale(row[ix], config.mode))
            .collect();
        let actual = prepared.scaler.inverse_target(&prepared.test.targets);
        let metrics = evaluate(&actual, &predicted)?;
        info!(
            mse = metrics.mse,
            rmse = metrics.rmse,
            mae = metrics.mae,
            mape = metrics.mape,
            "Persistence baseline on the test partition"
        );
    }
    Ok(())
}
