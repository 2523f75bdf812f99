//! Ordered price history for one symbol.

use super::{Bar, SamplingInterval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bars for one symbol, strictly increasing by timestamp.
///
/// An empty series is the normal "no data" value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    interval: SamplingInterval,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Builds a series, sorting bars and collapsing duplicate timestamps.
    ///
    /// When a timestamp repeats, the bar that appeared later in the input wins.
    pub fn new(symbol: impl Into<String>, interval: SamplingInterval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        // Stable sort keeps input order within a timestamp; keep the last of each run.
        bars.reverse();
        bars.dedup_by_key(|b| b.timestamp);
        bars.reverse();

        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn empty(symbol: impl Into<String>, interval: SamplingInterval) -> Self {
        Self::new(symbol, interval, Vec::new())
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn interval(&self) -> SamplingInterval {
        self.interval
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent `n` bars (or all of them if fewer exist).
    #[must_use]
    pub fn tail(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Keeps only bars from the last `n` distinct trading dates.
    ///
    /// Works for intraday series too: every bar of a kept date survives.
    #[must_use]
    pub fn last_sessions(mut self, n: usize) -> Self {
        let mut dates_seen = 0;
        let mut cut = self.bars.len();
        let mut current = None;
        for (i, bar) in self.bars.iter().enumerate().rev() {
            let date = bar.timestamp.date_naive();
            if current != Some(date) {
                if dates_seen == n {
                    break;
                }
                dates_seen += 1;
                current = Some(date);
            }
            cut = i;
        }
        self.bars.drain(..cut);
        self
    }

    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.first().map(|b| b.timestamp)
    }

    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.last().map(|b| b.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar_at(day: i64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
        Bar::new(ts, close, close, close, close, 100)
    }

    #[test]
    fn test_new_sorts_bars() {
        let series = PriceSeries::new(
            "TCS.NS",
            SamplingInterval::OneDay,
            vec![bar_at(2, 3.0), bar_at(0, 1.0), bar_at(1, 2.0)],
        );

        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.start(), Some(bar_at(0, 0.0).timestamp));
    }

    #[test]
    fn test_duplicate_timestamps_keep_later_bar() {
        let series = PriceSeries::new(
            "TCS.NS",
            SamplingInterval::OneDay,
            vec![bar_at(0, 1.0), bar_at(1, 2.0), bar_at(1, 2.5), bar_at(2, 3.0)],
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("TCS.NS", SamplingInterval::OneDay);

        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert!(series.end().is_none());
        assert!(series.tail(5).is_empty());
    }

    #[test]
    fn test_tail() {
        let series = PriceSeries::new(
            "TCS.NS",
            SamplingInterval::OneDay,
            (0..5).map(|d| bar_at(d, d as f64)).collect(),
        );

        let tail: Vec<f64> = series.tail(2).iter().map(|b| b.close).collect();
        assert_eq!(tail, vec![3.0, 4.0]);
        assert_eq!(series.tail(10).len(), 5);
    }

    #[test]
    fn test_last_sessions_skips_weekend_gap() {
        // 2024-01-01 is a Monday; days 5 and 6 are the weekend.
        let days = [0, 1, 2, 3, 4, 7, 8];
        let series = PriceSeries::new(
            "TCS.NS",
            SamplingInterval::OneDay,
            days.iter().map(|&d| bar_at(d, d as f64)).collect(),
        );

        let trimmed = series.last_sessions(5);
        assert_eq!(trimmed.closes(), vec![2.0, 3.0, 4.0, 7.0, 8.0]);
    }

    #[test]
    fn test_last_sessions_keeps_whole_intraday_dates() {
        let day = |d: i64, h: i64| {
            let ts = Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap() + Duration::days(d) + Duration::hours(h);
            Bar::new(ts, 1.0, 1.0, 1.0, 1.0, 1)
        };
        let bars = vec![day(0, 0), day(0, 1), day(1, 0), day(1, 1), day(2, 0), day(2, 1)];
        let series = PriceSeries::new("TCS.NS", SamplingInterval::OneHour, bars);

        assert_eq!(series.clone().last_sessions(2).len(), 4);
        assert_eq!(series.clone().last_sessions(10).len(), 6);
        assert!(series.last_sessions(0).is_empty());
    }
}
