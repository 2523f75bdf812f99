use serde::Serialize;
use std::fmt;

/// Why a fetch produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    /// Name of the source (or source chain) that failed.
    pub source: &'static str,
    pub reason: String,
}

impl FetchFailure {
    pub fn new(source: &'static str, reason: impl Into<String>) -> Self {
        Self {
            source,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable: {}", self.source, self.reason)
    }
}

/// Result of a fetch that never errors out to the caller.
///
/// `Empty` means the source answered and had nothing. `Failed` means the
/// source could not be reached or understood.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(FetchFailure),
}

impl<T> FetchOutcome<T> {
    pub fn failed(source: &'static str, reason: impl Into<String>) -> Self {
        Self::Failed(FetchFailure::new(source, reason))
    }

    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Data(value) => FetchOutcome::Data(f(value)),
            Self::Empty => FetchOutcome::Empty,
            Self::Failed(failure) => FetchOutcome::Failed(failure),
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    /// The data, or `T::default()` for both empty and failed outcomes.
    #[must_use]
    pub fn into_data_or_default(self) -> T {
        self.into_data().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let data: FetchOutcome<Vec<u32>> = FetchOutcome::Data(vec![1, 2]);
        let empty: FetchOutcome<Vec<u32>> = FetchOutcome::Empty;
        let failed: FetchOutcome<Vec<u32>> = FetchOutcome::failed("news", "HTTP 429");

        assert!(data.is_data());
        assert_eq!(data.data().map(Vec::len), Some(2));
        assert!(empty.is_empty());
        assert!(empty.data().is_none());
        assert!(failed.is_failed());
        assert_eq!(failed.failure().unwrap().to_string(), "news unavailable: HTTP 429");
        assert!(failed.into_data_or_default().is_empty());
    }

    #[test]
    fn test_map_preserves_variant() {
        let failed: FetchOutcome<u32> = FetchOutcome::failed("prices", "timeout");

        assert_eq!(FetchOutcome::Data(2).map(|v| v * 2), FetchOutcome::Data(4));
        assert_eq!(FetchOutcome::<u32>::Empty.map(|v| v * 2), FetchOutcome::Empty);
        assert!(failed.map(|v| v * 2).is_failed());
    }
}
