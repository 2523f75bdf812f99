use serde::{Deserialize, Serialize};

/// Derived per-bar values aligned with a series' closes. `None` means no value
/// at that position (e.g. before a moving-average window fills).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    #[must_use]
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at the final position, if defined.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.0.last().copied().flatten()
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}
