/*!
Data types and processing: OHLCV bars, named-column series and the functions which split, scale and window them
*/
use crate::*;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use ta::{Close, High, Low, Open, Volume};

pub mod fake;
pub mod indicators;
pub mod loader;
pub mod scale;
pub mod split;
pub mod window;

/// A bar of raw price data
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Bar<D = NaiveDateTime, F = CpuFloat> {
    /// This bar's timestamp
    #[serde(rename = "Date")]
    pub t: D,
    /// The opening price of this bar
    #[serde(rename = "Open")]
    pub o: F,
    /// The high price of this bar
    #[serde(rename = "High")]
    pub h: F,
    /// The low price of this bar
    #[serde(rename = "Low")]
    pub l: F,
    /// The closing price of this bar
    #[serde(rename = "Close")]
    pub c: F,
    /// The volume traded during this bar
    #[serde(rename = "Volume")]
    pub v: F,
}

impl Bar {
    /// The column names of the raw fields of a bar, in the order they are written to a series
    pub const COLUMNS: [&'static str; 5] = ["Open", "High", "Low", "Close", "Volume"];
}

impl<D, F: Copy> Bar<D, F> {
    /// The raw fields of a bar, in the same order as `Bar::COLUMNS`
    pub fn values(&self) -> [F; 5] {
        [self.o, self.h, self.l, self.c, self.v]
    }
}

impl<D, F> Open for Bar<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn open(&self) -> f64 {
        self.o.into()
    }
}

impl<D, F> High for Bar<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn high(&self) -> f64 {
        self.h.into()
    }
}

impl<D, F> Low for Bar<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn low(&self) -> f64 {
        self.l.into()
    }
}

impl<D, F> Close for Bar<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn close(&self) -> f64 {
        self.c.into()
    }
}

impl<D, F> Volume for Bar<D, F>
where
    F: Copy + Into<f64>,
{
    #[inline]
    fn volume(&self) -> f64 {
        self.v.into()
    }
}

/// A single row of a series
#[derive(Debug, Clone, PartialEq)]
pub struct Record<F = CpuFloat> {
    /// This row's timestamp, if the source had one
    pub t: Option<NaiveDateTime>,
    /// One value per column of the owning series
    pub values: Vec<F>,
}

impl<F> Record<F> {
    /// Create a new record
    #[inline]
    pub fn new(t: Option<NaiveDateTime>, values: Vec<F>) -> Record<F> {
        Record { t, values }
    }
}

/// A chronologically ordered table of numeric records with named columns.
///
/// Rows are never reordered: every operation on a series preserves the order it was built in.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<F = CpuFloat> {
    columns: Vec<String>,
    records: Vec<Record<F>>,
}

impl<F> Series<F> {
    /// Create an empty series with the given columns
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Series<F> {
        Series {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }
    /// Create a series from a set of records, checking each carries one value per column
    pub fn from_records<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        records: Vec<Record<F>>,
    ) -> Result<Series<F>> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (row, record) in records.iter().enumerate() {
            if record.values.len() != columns.len() {
                return Err(Error::RecordWidth {
                    row,
                    expected: columns.len(),
                    found: record.values.len(),
                });
            }
        }
        Ok(Series { columns, records })
    }
    /// Append a record to the end of this series
    pub fn push(&mut self, record: Record<F>) -> Result<()> {
        if record.values.len() != self.columns.len() {
            return Err(Error::RecordWidth {
                row: self.records.len(),
                expected: self.columns.len(),
                found: record.values.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }
    /// The column names of this series
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    /// The records of this series, in chronological order
    #[inline]
    pub fn records(&self) -> &[Record<F>] {
        &self.records
    }
    /// The number of records in this series
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    /// Whether this series has no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Get the index of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| Error::MissingColumn(name.to_owned()))
    }
    /// Iterate over the values of a named column
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = F> + '_>
    where
        F: Copy,
    {
        let ix = self.column_index(name)?;
        Ok(self.records.iter().map(move |record| record.values[ix]))
    }
    /// Copy out a contiguous range of rows as a new series with the same columns
    pub fn slice(&self, range: Range<usize>) -> Series<F>
    where
        F: Clone,
    {
        Series {
            columns: self.columns.clone(),
            records: self.records[range].to_vec(),
        }
    }
    /// Concatenate series sharing the same columns, in order
    pub fn concat<'a, I>(parts: I) -> Result<Series<F>>
    where
        F: Clone + 'a,
        I: IntoIterator<Item = &'a Series<F>>,
    {
        let mut parts = parts.into_iter();
        let mut result = if let Some(first) = parts.next() {
            first.clone()
        } else {
            return Ok(Series::new(Vec::<String>::new()));
        };
        for part in parts {
            if part.columns != result.columns {
                return Err(Error::SchemaMismatch {
                    expected: result.columns.clone(),
                    found: part.columns.clone(),
                });
            }
            result.records.extend_from_slice(&part.records);
        }
        Ok(result)
    }
}
