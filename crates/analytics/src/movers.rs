use market_pulse_data::IndexConstituent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Best and worst performers of an index snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movers {
    pub gainers: Vec<IndexConstituent>,
    pub losers: Vec<IndexConstituent>,
}

/// Ranks constituents by percentage change.
///
/// Gainers are sorted descending and losers ascending, each truncated to
/// `limit`. Rows without a change value sort last in both lists.
#[must_use]
pub fn rank_movers(constituents: &[IndexConstituent], limit: usize) -> Movers {
    let ranked = |descending: bool| {
        let mut rows = constituents.to_vec();
        rows.sort_by(|a, b| by_change(a, b, descending));
        rows.truncate(limit);
        rows
    };

    Movers {
        gainers: ranked(true),
        losers: ranked(false),
    }
}

fn by_change(a: &IndexConstituent, b: &IndexConstituent, descending: bool) -> Ordering {
    match (a.pct_change, b.pct_change) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}
