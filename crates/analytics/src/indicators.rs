//! Indicator engine: pure functions over closing prices and bars.
//!
//! Nothing here caches or fetches. Insufficient data is reported as `None`
//! (or `None` positions inside an [`IndicatorSeries`]); only invalid
//! parameters are errors.

use market_pulse_data::{Bar, IndicatorSeries};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IndicatorError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovingAverageKind {
    Simple,
    Exponential,
}

impl MovingAverageKind {
    /// Short column label, e.g. `sma_20`.
    #[must_use]
    pub fn label(&self, window: usize) -> String {
        match self {
            Self::Simple => format!("sma_{window}"),
            Self::Exponential => format!("ema_{window}"),
        }
    }
}

/// Moving average aligned with `series`.
///
/// `Simple` is undefined until the window fills. `Exponential` is seeded
/// with the first value and uses `alpha = 2 / (window + 1)`, so it is defined
/// from index 0.
///
/// # Errors
/// Returns `InvalidParameter` if `window` is zero
pub fn moving_average(
    series: &[f64],
    window: usize,
    kind: MovingAverageKind,
) -> Result<IndicatorSeries, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::invalid_parameter(
            "moving average window must be at least 1",
        ));
    }

    let values = match kind {
        MovingAverageKind::Simple => simple(series, window),
        MovingAverageKind::Exponential => exponential(series, window),
    };
    Ok(IndicatorSeries::new(values))
}

/// Simple moving average.
///
/// # Errors
/// Returns `InvalidParameter` if `window` is zero
pub fn sma(series: &[f64], window: usize) -> Result<IndicatorSeries, IndicatorError> {
    moving_average(series, window, MovingAverageKind::Simple)
}

/// Exponential moving average.
///
/// # Errors
/// Returns `InvalidParameter` if `window` is zero
pub fn ema(series: &[f64], window: usize) -> Result<IndicatorSeries, IndicatorError> {
    moving_average(series, window, MovingAverageKind::Exponential)
}

#[allow(clippy::cast_precision_loss)]
fn simple(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len().min(window - 1)];
    out.extend(
        series
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );
    out
}

#[allow(clippy::cast_precision_loss)]
fn exponential(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev: Option<f64> = None;
    series
        .iter()
        .map(|&x| {
            let next = match prev {
                None => x,
                Some(p) => alpha * x + (1.0 - alpha) * p,
            };
            prev = Some(next);
            Some(next)
        })
        .collect()
}

/// Percentage growth from the first to the last close.
#[must_use]
pub fn period_return(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    if first == 0.0 {
        return None;
    }
    let pct = (last - first) / first * 100.0;
    pct.is_finite().then_some(pct)
}

/// Annualized volatility of simple returns, in percent.
///
/// Uses the sample standard deviation (n - 1) scaled by
/// `sqrt(periods_per_year)`. Needs at least two returns.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn annualized_volatility(closes: &[f64], periods_per_year: NonZeroU32) -> Option<f64> {
    let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    if returns.len() < 2 || returns.iter().any(|r| !r.is_finite()) {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = variance.sqrt() * f64::from(periods_per_year.get()).sqrt() * 100.0;
    vol.is_finite().then_some(vol)
}

/// Mean traded volume across `bars`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_volume(bars: &[Bar]) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let total: f64 = bars.iter().map(|b| b.volume as f64).sum();
    Some(total / bars.len() as f64)
}

/// Move of the last close relative to some earlier price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub absolute: f64,
    /// `None` when the reference price is zero.
    pub percent: Option<f64>,
}

impl PriceChange {
    fn between(reference: f64, last: f64) -> Option<Self> {
        let absolute = last - reference;
        if !absolute.is_finite() {
            return None;
        }
        let percent = if reference == 0.0 {
            None
        } else {
            Some(absolute / reference * 100.0).filter(|p| p.is_finite())
        };
        Some(Self { absolute, percent })
    }

    #[must_use]
    pub fn is_up(&self) -> bool {
        self.absolute > 0.0
    }
}

/// Last close versus the bar before it.
#[must_use]
pub fn change_from_previous_bar(closes: &[f64]) -> Option<PriceChange> {
    match closes {
        [.., prev, last] => PriceChange::between(*prev, *last),
        _ => None,
    }
}

/// Last close versus an externally supplied prior close, such as a quote's
/// previous session close.
#[must_use]
pub fn change_from_reference(closes: &[f64], reference_close: f64) -> Option<PriceChange> {
    let last = *closes.last()?;
    PriceChange::between(reference_close, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    const CLOSES: [f64; 5] = [100.0, 102.0, 101.0, 105.0, 110.0];

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn daily() -> NonZeroU32 {
        NonZeroU32::new(252).unwrap()
    }

    // ========== Moving Average Tests ==========

    #[test]
    fn test_sma_reference_values() {
        let sma = sma(&CLOSES, 3).unwrap();

        assert_eq!(sma.len(), 5);
        assert_eq!(sma.values()[0], None);
        assert_eq!(sma.values()[1], None);
        assert!(approx(sma.values()[2].unwrap(), 101.0));
        assert!(approx(sma.last().unwrap(), 316.0 / 3.0));
    }

    #[test]
    fn test_sma_window_one_is_identity() {
        let sma = sma(&CLOSES, 1).unwrap();
        let expected: Vec<Option<f64>> = CLOSES.iter().map(|&c| Some(c)).collect();

        assert_eq!(sma.values(), expected.as_slice());
    }

    #[test]
    fn test_sma_window_larger_than_series_is_all_none() {
        let sma = sma(&CLOSES, 10).unwrap();

        assert_eq!(sma.len(), 5);
        assert!(sma.values().iter().all(Option::is_none));
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let ema = ema(&CLOSES, 3).unwrap();

        assert_eq!(ema.values()[0], Some(100.0));
        // alpha = 0.5
        assert!(approx(ema.values()[1].unwrap(), 101.0));
        assert!(approx(ema.values()[2].unwrap(), 101.0));
        assert!(approx(ema.values()[3].unwrap(), 103.0));
        assert!(approx(ema.last().unwrap(), 106.5));
    }

    #[test]
    fn test_ema_window_one_is_identity() {
        let ema = ema(&CLOSES, 1).unwrap();
        let expected: Vec<Option<f64>> = CLOSES.iter().map(|&c| Some(c)).collect();

        assert_eq!(ema.values(), expected.as_slice());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            moving_average(&CLOSES, 0, MovingAverageKind::Simple),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(ema(&CLOSES, 0).is_err());
    }

    #[test]
    fn test_empty_series_gives_empty_indicator() {
        assert!(sma(&[], 3).unwrap().is_empty());
        assert!(ema(&[], 3).unwrap().is_empty());
    }

    // ========== Return & Volatility Tests ==========

    #[test]
    fn test_period_return() {
        assert!(approx(period_return(&CLOSES).unwrap(), 10.0));
        assert_eq!(period_return(&[]), None);
        assert_eq!(period_return(&[0.0, 5.0]), None);
    }

    #[test]
    fn test_period_return_is_scale_invariant() {
        let scaled: Vec<f64> = CLOSES.iter().map(|c| c * 37.5).collect();

        assert!(approx(
            period_return(&scaled).unwrap(),
            period_return(&CLOSES).unwrap()
        ));
    }

    #[test]
    fn test_volatility_of_constant_series_is_zero() {
        let vol = annualized_volatility(&[50.0; 10], daily()).unwrap();
        assert!(approx(vol, 0.0));
    }

    #[test]
    fn test_volatility_reference_value() {
        // returns: +10%, -10%
        let vol = annualized_volatility(&[100.0, 110.0, 99.0], daily()).unwrap();
        let sample_std = (0.02_f64).sqrt();
        assert!(approx(vol, sample_std * 252.0_f64.sqrt() * 100.0));
    }

    #[test]
    fn test_volatility_needs_two_returns() {
        assert_eq!(annualized_volatility(&[100.0, 101.0], daily()), None);
        assert_eq!(annualized_volatility(&[], daily()), None);
    }

    #[test]
    fn test_volatility_with_zero_price_is_none() {
        assert_eq!(annualized_volatility(&[0.0, 1.0, 2.0], daily()), None);
    }

    // ========== Volume & Change Tests ==========

    #[test]
    fn test_average_volume() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars: Vec<Bar> = [100_u64, 200, 600]
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(start + Duration::days(i as i64), 1.0, 1.0, 1.0, 1.0, v))
            .collect();

        assert!(approx(average_volume(&bars).unwrap(), 300.0));
        assert_eq!(average_volume(&[]), None);
    }

    #[test]
    fn test_change_from_previous_bar() {
        let change = change_from_previous_bar(&CLOSES).unwrap();

        assert!(approx(change.absolute, 5.0));
        assert!(approx(change.percent.unwrap(), 5.0 / 105.0 * 100.0));
        assert!(change.is_up());
        assert_eq!(change_from_previous_bar(&[100.0]), None);
    }

    #[test]
    fn test_change_from_reference() {
        let change = change_from_reference(&CLOSES, 100.0).unwrap();
        assert!(approx(change.absolute, 10.0));
        assert!(approx(change.percent.unwrap(), 10.0));

        let zero_ref = change_from_reference(&CLOSES, 0.0).unwrap();
        assert!(approx(zero_ref.absolute, 110.0));
        assert_eq!(zero_ref.percent, None);

        assert_eq!(change_from_reference(&[], 100.0), None);
    }
}
