/*!
CSV input and output for bars and series
*/
use super::{Bar, Record, Series};
use crate::*;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

/// The default timestamp format of the gold price exports
pub const GOLD_DATETIME: &str = "%Y.%m.%d %H:%M";

/// How a CSV table is laid out
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// The field delimiter
    pub delimiter: u8,
    /// The column holding timestamps, if any. It is parsed rather than treated as a value column.
    pub time_column: Option<String>,
    /// The `chrono` format of the time column
    pub date_format: String,
}

impl Default for CsvOptions {
    fn default() -> CsvOptions {
        CsvOptions {
            delimiter: b',',
            time_column: Some("Date".to_owned()),
            date_format: GOLD_DATETIME.to_owned(),
        }
    }
}

impl CsvOptions {
    fn reader<R: Read>(&self, rdr: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(rdr)
    }
    fn writer<W: Write>(&self, wtr: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(wtr)
    }
    fn parse_time(&self, row: usize, column: &str, field: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(field, &self.date_format).map_err(|_| Error::Parse {
            row,
            column: column.to_owned(),
            value: field.to_owned(),
        })
    }
}

fn parse_value(row: usize, column: &str, field: &str) -> Result<f64> {
    match f64::from_str(field) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::Parse {
            row,
            column: column.to_owned(),
            value: field.to_owned(),
        }),
    }
}

/// Read a series from a Reader. Every column other than the time column must hold finite numbers.
pub fn read_series<R: Read>(rdr: R, options: &CsvOptions) -> Result<Series> {
    let mut rdr = options.reader(rdr);
    let headers = rdr.headers()?.clone();
    let time_ix = match &options.time_column {
        Some(name) => Some(
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| Error::MissingColumn(name.clone()))?,
        ),
        None => None,
    };
    let columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(ix, _)| Some(*ix) != time_ix)
        .collect();
    let mut series = Series::new(columns.iter().map(|(_, name)| *name));
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let t = match (time_ix, &options.time_column) {
            (Some(ix), Some(name)) => Some(options.parse_time(row, name, record.get(ix).unwrap_or(""))?),
            _ => None,
        };
        let values = columns
            .iter()
            .map(|&(ix, name)| parse_value(row, name, record.get(ix).unwrap_or("")))
            .collect::<Result<Vec<_>>>()?;
        series.push(Record::new(t, values))?;
    }
    debug!(rows = series.len(), columns = series.columns().len(), "Read series");
    Ok(series)
}

/// Write a series to a Writer, with the time column first if the options name one.
/// On success, return how many records were written.
pub fn write_series<W: Write>(wtr: W, series: &Series, options: &CsvOptions) -> Result<usize> {
    let mut wtr = options.writer(wtr);
    let time_column = options.time_column.as_deref();
    let mut header: Vec<&str> = time_column.into_iter().collect();
    header.extend(series.columns().iter().map(String::as_str));
    wtr.write_record(&header)?;
    let mut written = 0;
    for record in series.records() {
        let mut fields = Vec::with_capacity(header.len());
        if time_column.is_some() {
            fields.push(
                record
                    .t
                    .map(|t| t.format(&options.date_format).to_string())
                    .unwrap_or_default(),
            );
        }
        fields.extend(record.values.iter().map(f64::to_string));
        wtr.write_record(&fields)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Read OHLCV bars from a Reader, looking up the price columns by name and ignoring any others
pub fn read_bars<R: Read>(rdr: R, options: &CsvOptions) -> Result<Vec<Bar>> {
    let time_column = options
        .time_column
        .as_deref()
        .ok_or_else(|| Error::MissingColumn("time column".to_owned()))?;
    let mut rdr = options.reader(rdr);
    let headers = rdr.headers()?.clone();
    let index = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| Error::MissingColumn(name.to_owned()))
    };
    let t_ix = index(time_column)?;
    let mut ix = [0; 5];
    for (slot, name) in ix.iter_mut().zip(Bar::COLUMNS.iter()) {
        *slot = index(name)?;
    }
    let mut bars = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |i: usize| record.get(ix[i]).unwrap_or("");
        bars.push(Bar {
            t: options.parse_time(row, time_column, record.get(t_ix).unwrap_or(""))?,
            o: parse_value(row, Bar::COLUMNS[0], field(0))?,
            h: parse_value(row, Bar::COLUMNS[1], field(1))?,
            l: parse_value(row, Bar::COLUMNS[2], field(2))?,
            c: parse_value(row, Bar::COLUMNS[3], field(3))?,
            v: parse_value(row, Bar::COLUMNS[4], field(4))?,
        });
    }
    debug!(bars = bars.len(), "Read bars");
    Ok(bars)
}

/// Write bars to a Writer in the layout `read_bars` expects.
/// On success, return how many bars were written.
pub fn write_bars<W, I>(wtr: W, bars: I, options: &CsvOptions) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Bar>,
{
    let mut wtr = options.writer(wtr);
    let time_column = options.time_column.as_deref().unwrap_or("Date");
    let mut header = vec![time_column];
    header.extend_from_slice(&Bar::COLUMNS);
    wtr.write_record(&header)?;
    let mut written = 0;
    for bar in bars {
        let mut fields = vec![bar.t.format(&options.date_format).to_string()];
        fields.extend(bar.values().iter().map(f64::to_string));
        wtr.write_record(&fields)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}
