//! Sampling intervals and lookback periods.

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

/// Trading days per year used to annualize daily returns.
pub const DEFAULT_PERIODS_PER_YEAR: NonZeroU32 = match NonZeroU32::new(252) {
    Some(n) => n,
    None => panic!("252 is non-zero"),
};

/// Calendar days fetched to be sure of covering five trading sessions.
const FIVE_SESSION_WINDOW_DAYS: i64 = 14;

/// Minutes in one NSE cash session (09:15 to 15:30).
const SESSION_MINUTES: u32 = 375;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCodeError {
    #[error("Unknown sampling interval: {0}")]
    Interval(String),

    #[error("Unknown lookback period: {0}")]
    Period(String),
}

/// Spacing between bars, named by the upstream interval code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SamplingInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl SamplingInterval {
    pub const ALL: [Self; 13] = [
        Self::OneMinute,
        Self::TwoMinutes,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
        Self::NinetyMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::FiveDays,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::TwoMinutes => "2m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::SixtyMinutes => "60m",
            Self::NinetyMinutes => "90m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
        }
    }

    fn minutes(&self) -> Option<u32> {
        match self {
            Self::OneMinute => Some(1),
            Self::TwoMinutes => Some(2),
            Self::FiveMinutes => Some(5),
            Self::FifteenMinutes => Some(15),
            Self::ThirtyMinutes => Some(30),
            Self::SixtyMinutes | Self::OneHour => Some(60),
            Self::NinetyMinutes => Some(90),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_intraday(&self) -> bool {
        self.minutes().is_some()
    }

    /// Annualization factor for returns sampled at this interval.
    #[must_use]
    pub fn periods_per_year(&self) -> NonZeroU32 {
        let periods = match self.minutes() {
            Some(minutes) => DEFAULT_PERIODS_PER_YEAR.get() * SESSION_MINUTES / minutes,
            None => match self {
                Self::FiveDays => 50,
                Self::OneWeek => 52,
                Self::OneMonth => 12,
                Self::ThreeMonths => 4,
                _ => DEFAULT_PERIODS_PER_YEAR.get(),
            },
        };
        NonZeroU32::new(periods).unwrap_or(DEFAULT_PERIODS_PER_YEAR)
    }
}

impl fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingInterval {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == code)
            .ok_or_else(|| ParseCodeError::Interval(s.to_string()))
    }
}

/// How far back a history request reaches from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LookbackPeriod {
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl LookbackPeriod {
    pub const ALL: [Self; 9] = [
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::YearToDate,
        Self::Max,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// Number of trading sessions the period covers when it is counted in
    /// sessions rather than calendar time.
    #[must_use]
    pub fn trading_sessions(&self) -> Option<usize> {
        match self {
            Self::FiveDays => Some(5),
            _ => None,
        }
    }

    /// Resolves the period to a `(start, end)` range ending at `now`.
    ///
    /// `Max` starts at the Unix epoch. Month arithmetic clamps to the end of
    /// shorter months. Session-counted periods get a wider calendar window
    /// that spans weekends and holidays; trim the result with
    /// [`crate::PriceSeries::last_sessions`].
    #[must_use]
    pub fn range_ending(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let months_back = |m: u32| now.checked_sub_months(Months::new(m)).unwrap_or_default();
        let start = match self {
            Self::FiveDays => now - Duration::days(FIVE_SESSION_WINDOW_DAYS),
            Self::OneMonth => months_back(1),
            Self::ThreeMonths => months_back(3),
            Self::SixMonths => months_back(6),
            Self::OneYear => months_back(12),
            Self::TwoYears => months_back(24),
            Self::FiveYears => months_back(60),
            Self::YearToDate => Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            Self::Max => DateTime::<Utc>::default(),
        };
        (start, now)
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == code)
            .ok_or_else(|| ParseCodeError::Period(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== SamplingInterval Tests ==========

    #[test]
    fn test_interval_codes_round_trip_through_from_str() {
        for interval in SamplingInterval::ALL {
            assert_eq!(interval.as_str().parse::<SamplingInterval>().unwrap(), interval);
        }
        assert!("7m".parse::<SamplingInterval>().is_err());
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(SamplingInterval::OneDay.periods_per_year().get(), 252);
        assert_eq!(SamplingInterval::OneWeek.periods_per_year().get(), 52);
        assert_eq!(SamplingInterval::OneMonth.periods_per_year().get(), 12);
        assert_eq!(SamplingInterval::ThreeMonths.periods_per_year().get(), 4);
        assert_eq!(SamplingInterval::SixtyMinutes.periods_per_year().get(), 1575);
        assert_eq!(SamplingInterval::OneHour.periods_per_year().get(), 1575);
        assert_eq!(SamplingInterval::FiveMinutes.periods_per_year().get(), 18_900);
    }

    #[test]
    fn test_intraday_flag() {
        assert!(SamplingInterval::FifteenMinutes.is_intraday());
        assert!(!SamplingInterval::OneDay.is_intraday());
    }

    #[test]
    fn test_interval_serde_uses_codes() {
        let json = serde_json::to_string(&SamplingInterval::OneWeek).unwrap();
        assert_eq!(json, "\"1wk\"");
    }

    // ========== LookbackPeriod Tests ==========

    #[test]
    fn test_period_ranges() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap();

        let (start, end) = LookbackPeriod::FiveDays.range_ending(now);
        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 17, 10, 0, 0).unwrap());

        let (start, _) = LookbackPeriod::OneMonth.range_ending(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap());

        let (start, _) = LookbackPeriod::OneYear.range_ending(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 3, 31, 10, 0, 0).unwrap());

        let (start, _) = LookbackPeriod::YearToDate.range_ending(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let (start, _) = LookbackPeriod::Max.range_ending(now);
        assert_eq!(start.timestamp(), 0);
    }

    #[test]
    fn test_five_day_window_covers_a_weekend() {
        // Monday morning: the last five sessions start on the previous Monday.
        let monday = Utc.with_ymd_and_hms(2024, 6, 10, 4, 0, 0).unwrap();
        let (start, _) = LookbackPeriod::FiveDays.range_ending(monday);

        assert!(start <= Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap());
        assert_eq!(LookbackPeriod::FiveDays.trading_sessions(), Some(5));
        assert_eq!(LookbackPeriod::OneMonth.trading_sessions(), None);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("6MO".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::SixMonths);
        assert_eq!(
            "10y".parse::<LookbackPeriod>().unwrap_err(),
            ParseCodeError::Period("10y".to_string())
        );
    }
}
