//! Data models for the market dashboard.
//!
//! Prices are plain `f64`; nothing here rounds beyond display formatting.

pub mod bar;
pub mod constituent;
pub mod indicator;
pub mod interval;
pub mod news;
pub mod series;

pub use bar::Bar;
pub use constituent::IndexConstituent;
pub use indicator::IndicatorSeries;
pub use interval::{LookbackPeriod, ParseCodeError, SamplingInterval, DEFAULT_PERIODS_PER_YEAR};
pub use news::NewsItem;
pub use series::PriceSeries;
