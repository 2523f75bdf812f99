//! Index constituent snapshot sources.

pub mod nse;

pub use nse::NseIndexClient;

use crate::error::Result;
use async_trait::async_trait;
use market_pulse_data::IndexConstituent;

#[async_trait]
pub trait IndexSnapshotSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Current constituents of `index` with last price and percentage change.
    async fn fetch_constituents(&self, index: &str) -> Result<Vec<IndexConstituent>>;
}
