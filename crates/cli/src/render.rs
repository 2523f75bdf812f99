//! Terminal formatting shared by the commands.

use market_pulse_analytics::PriceChange;
use market_pulse_providers::FetchOutcome;

pub const WIDTH: usize = 90;

pub fn banner(title: &str) {
    println!();
    println!("{}", "=".repeat(WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(WIDTH));
}

pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(WIDTH.min(60)));
}

pub fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:+.2}%"))
}

/// `+1.50 (+1.23%)`, or `-` when there is no change.
pub fn change(value: Option<PriceChange>) -> String {
    match value {
        Some(c) => format!("{:+.2} ({})", c.absolute, pct(c.percent)),
        None => "-".to_string(),
    }
}

pub fn volume(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 10_000_000.0 => format!("{:.2}Cr", v / 10_000_000.0),
        Some(v) if v >= 100_000.0 => format!("{:.2}L", v / 100_000.0),
        Some(v) if v >= 1_000.0 => format!("{:.1}K", v / 1_000.0),
        Some(v) => format!("{v:.0}"),
        None => "-".to_string(),
    }
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// The line a panel prints instead of its data, or `None` when there is data.
pub fn notice<T>(panel: &str, outcome: &FetchOutcome<T>) -> Option<String> {
    match outcome {
        FetchOutcome::Data(_) => None,
        FetchOutcome::Empty => Some(format!("[info] {panel}: no data available")),
        FetchOutcome::Failed(failure) => Some(format!("[warn] {panel}: {failure}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Number Formatting Tests ==========

    #[test]
    fn test_price_and_pct() {
        assert_eq!(price(Some(22_104.456)), "22104.46");
        assert_eq!(price(None), "-");
        assert_eq!(pct(Some(1.234)), "+1.23%");
        assert_eq!(pct(Some(-0.5)), "-0.50%");
        assert_eq!(pct(None), "-");
    }

    #[test]
    fn test_change() {
        let up = PriceChange {
            absolute: 1.5,
            percent: Some(1.234),
        };
        assert_eq!(change(Some(up)), "+1.50 (+1.23%)");

        let no_pct = PriceChange {
            absolute: -2.0,
            percent: None,
        };
        assert_eq!(change(Some(no_pct)), "-2.00 (-)");
        assert_eq!(change(None), "-");
    }

    #[test]
    fn test_volume_uses_indian_units() {
        assert_eq!(volume(Some(950.0)), "950");
        assert_eq!(volume(Some(12_500.0)), "12.5K");
        assert_eq!(volume(Some(250_000.0)), "2.50L");
        assert_eq!(volume(Some(35_000_000.0)), "3.50Cr");
        assert_eq!(volume(None), "-");
    }

    // ========== Text Tests ==========

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Sensex rallies on strong inflows", 12), "Sensex ra...");
        assert_eq!(truncate("रुपया मजबूत हुआ आज", 8), "रुपया...");
    }

    #[test]
    fn test_notice() {
        let data: FetchOutcome<u8> = FetchOutcome::Data(1);
        let empty: FetchOutcome<u8> = FetchOutcome::Empty;
        let failed: FetchOutcome<u8> = FetchOutcome::failed("nse", "HTTP 503");

        assert_eq!(notice("Snapshot", &data), None);
        assert_eq!(
            notice("Snapshot", &empty).as_deref(),
            Some("[info] Snapshot: no data available")
        );
        assert_eq!(
            notice("Snapshot", &failed).as_deref(),
            Some("[warn] Snapshot: nse unavailable: HTTP 503")
        );
    }
}
