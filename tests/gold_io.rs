/*!
Test CSV IO of gold bars and enriched series
*/
use goldscale::data::{fake::*, indicators::*, loader::*, *};
use std::io::{Seek, SeekFrom};
use tempfile::tempfile;

#[test]
fn fake_bars_roundtrip() {
    const TEST_DATA_LENGTH: usize = 10000;
    let bars: Vec<Bar> = gold_walk(42).take(TEST_DATA_LENGTH).collect();
    let options = CsvOptions {
        delimiter: b';',
        ..CsvOptions::default()
    };
    let mut tmp = tempfile().expect("Tempfile creation should not fail!");
    let written = write_bars(&mut tmp, bars.iter().copied(), &options)
        .expect("Writing test data should not fail!");
    assert_eq!(written, TEST_DATA_LENGTH);
    tmp.seek(SeekFrom::Start(0)).expect("Seek should not fail");
    let read = read_bars(&mut tmp, &options).expect("Reading test data should not fail");
    assert_eq!(bars, read);
}

#[test]
fn enriched_series_roundtrip() {
    let bars: Vec<Bar> = gold_walk(3).take(500).collect();
    let series = enrich(&bars, &IndicatorConfig::default()).expect("Enriching should not fail");
    let options = CsvOptions::default();
    let mut tmp = tempfile().expect("Tempfile creation should not fail!");
    write_series(&mut tmp, &series, &options).expect("Writing test data should not fail!");
    tmp.seek(SeekFrom::Start(0)).expect("Seek should not fail");
    let read = read_series(&mut tmp, &options).expect("Reading test data should not fail");
    assert_eq!(series, read);
    assert_eq!(read.columns(), &IndicatorConfig::default().columns()[..]);
}
