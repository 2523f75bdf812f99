use serde::{Deserialize, Serialize};

/// One row of an index constituent snapshot.
///
/// Upstream values that are not numeric are kept as `None` rather than
/// dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConstituent {
    pub symbol: String,
    pub last_price: Option<f64>,
    pub pct_change: Option<f64>,
}

impl IndexConstituent {
    pub fn new(symbol: impl Into<String>, last_price: Option<f64>, pct_change: Option<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            last_price,
            pct_change,
        }
    }
}
