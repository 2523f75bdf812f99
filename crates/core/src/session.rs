//! Per-session user state: watchlist, price alerts and a trade log.
//!
//! State lives only in process memory and is keyed by [`SessionId`]. Nothing
//! here is persisted; closing a session (or exiting) discards it.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
}

impl SessionError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidEntry(msg.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub symbol: String,
    pub target: f64,
    pub condition: AlertCondition,
}

impl PriceAlert {
    /// True when `price` has crossed (or touched) the target in the alert's direction.
    #[must_use]
    pub fn is_triggered(&self, price: f64) -> bool {
        match self.condition {
            AlertCondition::Above => price >= self.target,
            AlertCondition::Below => price <= self.target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: u32,
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
}

impl TradeEntry {
    #[must_use]
    pub fn notional(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub watchlist: Vec<String>,
    pub alerts: Vec<PriceAlert>,
    pub trades: Vec<TradeEntry>,
}

/// In-memory store of every open session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionState>>,
}

fn normalize_symbol(symbol: &str) -> Result<String, SessionError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(SessionError::invalid("symbol cannot be empty"));
    }
    if symbol.chars().any(char::is_whitespace) {
        return Err(SessionError::invalid(format!(
            "symbol cannot contain whitespace: {symbol}"
        )));
    }
    Ok(symbol)
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh, empty session.
    pub fn open(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions.write().insert(id, SessionState::default());
        tracing::debug!(session = %id, "session opened");
        id
    }

    /// Discards a session and returns its final state.
    pub fn close(&self, id: SessionId) -> Result<SessionState, SessionError> {
        let state = self
            .sessions
            .write()
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        tracing::debug!(session = %id, "session closed");
        Ok(state)
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn with_state<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut SessionState) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write();
        let state = sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        f(state)
    }

    /// Adds a symbol to the watchlist. Returns `false` if it was already present.
    pub fn add_to_watchlist(&self, id: SessionId, symbol: &str) -> Result<bool, SessionError> {
        let symbol = normalize_symbol(symbol)?;
        self.with_state(id, |state| {
            if state.watchlist.contains(&symbol) {
                return Ok(false);
            }
            state.watchlist.push(symbol);
            Ok(true)
        })
    }

    /// Removes a symbol. Returns `false` if it was not on the watchlist.
    pub fn remove_from_watchlist(&self, id: SessionId, symbol: &str) -> Result<bool, SessionError> {
        let symbol = normalize_symbol(symbol)?;
        self.with_state(id, |state| {
            let before = state.watchlist.len();
            state.watchlist.retain(|s| *s != symbol);
            Ok(state.watchlist.len() != before)
        })
    }

    pub fn watchlist(&self, id: SessionId) -> Result<Vec<String>, SessionError> {
        self.with_state(id, |state| Ok(state.watchlist.clone()))
    }

    pub fn add_alert(
        &self,
        id: SessionId,
        symbol: &str,
        target: f64,
        condition: AlertCondition,
    ) -> Result<PriceAlert, SessionError> {
        let symbol = normalize_symbol(symbol)?;
        if !target.is_finite() || target <= 0.0 {
            return Err(SessionError::invalid(format!(
                "alert target must be a positive price, got {target}"
            )));
        }
        let alert = PriceAlert {
            symbol,
            target,
            condition,
        };
        self.with_state(id, |state| {
            state.alerts.push(alert.clone());
            Ok(alert)
        })
    }

    pub fn alerts(&self, id: SessionId) -> Result<Vec<PriceAlert>, SessionError> {
        self.with_state(id, |state| Ok(state.alerts.clone()))
    }

    /// Alerts for `symbol` that fire at `price`. Alerts stay registered after firing.
    pub fn triggered_alerts(
        &self,
        id: SessionId,
        symbol: &str,
        price: f64,
    ) -> Result<Vec<PriceAlert>, SessionError> {
        let symbol = normalize_symbol(symbol)?;
        self.with_state(id, |state| {
            Ok(state
                .alerts
                .iter()
                .filter(|a| a.symbol == symbol && a.is_triggered(price))
                .cloned()
                .collect())
        })
    }

    pub fn record_trade(
        &self,
        id: SessionId,
        symbol: &str,
        side: TradeSide,
        quantity: u32,
        price: f64,
    ) -> Result<TradeEntry, SessionError> {
        let symbol = normalize_symbol(symbol)?;
        if quantity == 0 {
            return Err(SessionError::invalid("trade quantity must be positive"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(SessionError::invalid(format!(
                "trade price must be positive, got {price}"
            )));
        }
        let entry = TradeEntry {
            symbol,
            side,
            quantity,
            price,
            recorded_at: Utc::now(),
        };
        self.with_state(id, |state| {
            state.trades.push(entry.clone());
            Ok(entry)
        })
    }

    pub fn trades(&self, id: SessionId) -> Result<Vec<TradeEntry>, SessionError> {
        self.with_state(id, |state| Ok(state.trades.clone()))
    }

    /// Copy of the full session state.
    pub fn snapshot(&self, id: SessionId) -> Result<SessionState, SessionError> {
        self.with_state(id, |state| Ok(state.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Watchlist Tests ==========

    #[test]
    fn test_watchlist_normalizes_and_dedupes() {
        let store = SessionStore::new();
        let id = store.open();

        assert!(store.add_to_watchlist(id, " reliance.ns ").unwrap());
        assert!(!store.add_to_watchlist(id, "RELIANCE.NS").unwrap());
        assert!(store.add_to_watchlist(id, "TCS.NS").unwrap());

        assert_eq!(store.watchlist(id).unwrap(), vec!["RELIANCE.NS", "TCS.NS"]);
    }

    #[test]
    fn test_watchlist_remove() {
        let store = SessionStore::new();
        let id = store.open();
        store.add_to_watchlist(id, "INFY.NS").unwrap();

        assert!(store.remove_from_watchlist(id, "infy.ns").unwrap());
        assert!(!store.remove_from_watchlist(id, "INFY.NS").unwrap());
        assert!(store.watchlist(id).unwrap().is_empty());
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let store = SessionStore::new();
        let id = store.open();

        let err = store.add_to_watchlist(id, "   ").unwrap_err();
        assert!(matches!(err, SessionError::InvalidEntry(_)));
    }

    // ========== Session Isolation Tests ==========

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.open();
        let b = store.open();

        store.add_to_watchlist(a, "TCS.NS").unwrap();

        assert_eq!(store.watchlist(a).unwrap().len(), 1);
        assert!(store.watchlist(b).unwrap().is_empty());
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_closed_session_is_unknown() {
        let store = SessionStore::new();
        let id = store.open();
        store.add_to_watchlist(id, "TCS.NS").unwrap();

        let state = store.close(id).unwrap();
        assert_eq!(state.watchlist, vec!["TCS.NS"]);

        assert_eq!(
            store.watchlist(id).unwrap_err(),
            SessionError::UnknownSession(id)
        );
    }

    // ========== Alert Tests ==========

    #[test]
    fn test_alert_triggering() {
        let store = SessionStore::new();
        let id = store.open();
        store
            .add_alert(id, "TCS.NS", 4000.0, AlertCondition::Above)
            .unwrap();
        store
            .add_alert(id, "TCS.NS", 3500.0, AlertCondition::Below)
            .unwrap();
        store
            .add_alert(id, "INFY.NS", 1000.0, AlertCondition::Above)
            .unwrap();

        let fired = store.triggered_alerts(id, "tcs.ns", 4000.0).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].condition, AlertCondition::Above);

        let fired = store.triggered_alerts(id, "TCS.NS", 3400.0).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].condition, AlertCondition::Below);

        assert!(store.triggered_alerts(id, "TCS.NS", 3700.0).unwrap().is_empty());
    }

    #[test]
    fn test_alert_rejects_non_positive_target() {
        let store = SessionStore::new();
        let id = store.open();

        assert!(store.add_alert(id, "TCS.NS", 0.0, AlertCondition::Above).is_err());
        assert!(store
            .add_alert(id, "TCS.NS", f64::NAN, AlertCondition::Below)
            .is_err());
        assert!(store.alerts(id).unwrap().is_empty());
    }

    // ========== Trade Log Tests ==========

    #[test]
    fn test_record_trade() {
        let store = SessionStore::new();
        let id = store.open();

        let entry = store
            .record_trade(id, "hdfcbank.ns", TradeSide::Buy, 10, 1650.5)
            .unwrap();

        assert_eq!(entry.symbol, "HDFCBANK.NS");
        assert!((entry.notional() - 16505.0).abs() < 1e-9);
        assert_eq!(store.trades(id).unwrap().len(), 1);
    }

    #[test]
    fn test_record_trade_validation() {
        let store = SessionStore::new();
        let id = store.open();

        assert!(store.record_trade(id, "TCS.NS", TradeSide::Sell, 0, 10.0).is_err());
        assert!(store.record_trade(id, "TCS.NS", TradeSide::Sell, 1, -1.0).is_err());
        assert!(store.trades(id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let stray = SessionId::new();

        assert!(matches!(
            store.record_trade(stray, "TCS.NS", TradeSide::Buy, 1, 1.0),
            Err(SessionError::UnknownSession(_))
        ));
    }
}
