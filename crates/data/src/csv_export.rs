use crate::models::{IndicatorSeries, PriceSeries};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Indicator column '{column}' has {actual} values, series has {expected} bars")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A named derived column written next to the OHLCV columns.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorColumn<'a> {
    pub name: &'a str,
    pub series: &'a IndicatorSeries,
}

impl<'a> IndicatorColumn<'a> {
    pub fn new(name: &'a str, series: &'a IndicatorSeries) -> Self {
        Self { name, series }
    }
}

pub struct CsvExporter;

impl CsvExporter {
    pub const BASE_HEADER: [&'static str; 6] =
        ["timestamp", "open", "high", "low", "close", "volume"];

    /// Writes a price series with optional indicator columns as CSV.
    ///
    /// Format: timestamp,open,high,low,close,volume[,indicator...]
    ///
    /// Timestamps are RFC 3339; undefined indicator values are empty cells.
    ///
    /// # Errors
    /// Returns error if an indicator column is not aligned with the series or writing fails
    pub fn write_series<W: Write>(
        writer: W,
        series: &PriceSeries,
        columns: &[IndicatorColumn<'_>],
    ) -> Result<(), ExportError> {
        for column in columns {
            if column.series.len() != series.len() {
                return Err(ExportError::LengthMismatch {
                    column: column.name.to_string(),
                    expected: series.len(),
                    actual: column.series.len(),
                });
            }
        }

        let mut writer = Writer::from_writer(writer);

        let mut header: Vec<&str> = Self::BASE_HEADER.to_vec();
        header.extend(columns.iter().map(|c| c.name));
        writer.write_record(&header)?;

        for (i, bar) in series.bars().iter().enumerate() {
            let mut row = vec![
                bar.timestamp.to_rfc3339(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            row.extend(
                columns
                    .iter()
                    .map(|c| c.series.values()[i].map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&row)?;
        }

        writer.flush()?;
        tracing::debug!(
            symbol = series.symbol(),
            rows = series.len(),
            columns = header.len(),
            "exported series to CSV"
        );
        Ok(())
    }

    /// Renders the export into a string, e.g. for a download payload.
    ///
    /// # Errors
    /// Same as [`CsvExporter::write_series`]
    pub fn to_csv_string(
        series: &PriceSeries,
        columns: &[IndicatorColumn<'_>],
    ) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        Self::write_series(&mut buffer, series, columns)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Writes the export to a file, replacing any existing one.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or writing fails
    pub fn write_to_path(
        path: impl AsRef<Path>,
        series: &PriceSeries,
        columns: &[IndicatorColumn<'_>],
    ) -> Result<(), ExportError> {
        let file = File::create(path.as_ref())?;
        Self::write_series(file, series, columns)
    }
}
