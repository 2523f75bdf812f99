use crate::indicators::{
    annualized_volatility, average_volume, change_from_previous_bar, change_from_reference,
    period_return, PriceChange,
};
use market_pulse_data::PriceSeries;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Which earlier price the "last change" figure is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ChangeReference {
    #[default]
    PreviousBar,
    PriorClose(f64),
}

/// Scalar figures shown beside a price chart. Every field is `None` when the
/// input has too little data for it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub last_close: Option<f64>,
    pub period_return_pct: Option<f64>,
    pub annualized_volatility_pct: Option<f64>,
    pub average_volume: Option<f64>,
    pub last_change: Option<PriceChange>,
}

impl SummaryMetrics {
    #[must_use]
    pub fn compute(
        series: &PriceSeries,
        periods_per_year: NonZeroU32,
        reference: ChangeReference,
    ) -> Self {
        let closes = series.closes();
        let last_change = match reference {
            ChangeReference::PreviousBar => change_from_previous_bar(&closes),
            ChangeReference::PriorClose(prior) => change_from_reference(&closes, prior),
        };

        Self {
            last_close: closes.last().copied(),
            period_return_pct: period_return(&closes),
            annualized_volatility_pct: annualized_volatility(&closes, periods_per_year),
            average_volume: average_volume(series.bars()),
            last_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use market_pulse_data::{Bar, SamplingInterval, DEFAULT_PERIODS_PER_YEAR};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c, c, c, 1_000))
            .collect();
        PriceSeries::new("^NSEI", SamplingInterval::OneDay, bars)
    }

    #[test]
    fn test_empty_series_has_no_metrics() {
        let metrics = SummaryMetrics::compute(
            &series(&[]),
            DEFAULT_PERIODS_PER_YEAR,
            ChangeReference::PreviousBar,
        );

        assert_eq!(metrics, SummaryMetrics::default());
    }

    #[test]
    fn test_compute_previous_bar() {
        let metrics = SummaryMetrics::compute(
            &series(&[100.0, 102.0, 101.0, 105.0, 110.0]),
            DEFAULT_PERIODS_PER_YEAR,
            ChangeReference::PreviousBar,
        );

        assert_eq!(metrics.last_close, Some(110.0));
        assert!((metrics.period_return_pct.unwrap() - 10.0).abs() < 1e-9);
        assert!(metrics.annualized_volatility_pct.unwrap() > 0.0);
        assert_eq!(metrics.average_volume, Some(1_000.0));
        assert!((metrics.last_change.unwrap().absolute - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_prior_close() {
        let metrics = SummaryMetrics::compute(
            &series(&[100.0, 110.0]),
            DEFAULT_PERIODS_PER_YEAR,
            ChangeReference::PriorClose(120.0),
        );

        let change = metrics.last_change.unwrap();
        assert!((change.absolute + 10.0).abs() < 1e-9);
        assert!(!change.is_up());
        // one return only
        assert_eq!(metrics.annualized_volatility_pct, None);
    }
}
