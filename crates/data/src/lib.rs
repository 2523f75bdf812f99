//! Data model and export for the market dashboard.
//!
//! This crate provides:
//! - OHLCV bars and ordered price series
//! - Sampling intervals and lookback periods
//! - Normalized news items and index constituent rows
//! - CSV export of a series plus indicator columns

pub mod csv_export;
pub mod models;

pub use csv_export::{CsvExporter, ExportError, IndicatorColumn};
pub use models::{
    Bar, IndexConstituent, IndicatorSeries, LookbackPeriod, NewsItem, ParseCodeError,
    PriceSeries, SamplingInterval, DEFAULT_PERIODS_PER_YEAR,
};
