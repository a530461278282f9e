//! Run configuration for the dashboard and the historical time ranges.

/// Configuration for the globe dashboard.
#[derive(Clone)]
pub struct GlobeConfig {
    pub time_step: f32,
    pub refresh_secs: u64,
    pub seed: Option<u64>,
    pub tilt: f64,
    pub force_mock: bool,
    pub token: Option<String>,
}

/// Historical chart window. Point counts and sampling intervals follow
/// the chart widget: 60 minutes, 24 hours, 7 or 30 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
}

impl TimeRange {
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Hour => "1h",
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        }
    }

    pub fn points(&self) -> usize {
        match self {
            TimeRange::Hour => 60,
            TimeRange::Day => 24,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }

    pub fn interval_ms(&self) -> i64 {
        match self {
            TimeRange::Hour => 60_000,
            TimeRange::Day => 3_600_000,
            TimeRange::Week | TimeRange::Month => 86_400_000,
        }
    }

    /// Cycle order used by the dashboard's range key.
    pub fn next(&self) -> TimeRange {
        match self {
            TimeRange::Hour => TimeRange::Day,
            TimeRange::Day => TimeRange::Week,
            TimeRange::Week => TimeRange::Month,
            TimeRange::Month => TimeRange::Hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_cycle_visits_every_window() {
        let mut range = TimeRange::Hour;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(range.label());
            range = range.next();
        }
        assert_eq!(seen, ["1h", "24h", "7d", "30d"]);
        assert_eq!(range, TimeRange::Hour);
    }

    #[test]
    fn window_spans_match_their_labels() {
        // 60 one-minute points cover the hour, 24 hourly points the day.
        assert_eq!(TimeRange::Hour.points() as i64 * TimeRange::Hour.interval_ms(), 3_600_000);
        assert_eq!(TimeRange::Day.points() as i64 * TimeRange::Day.interval_ms(), 86_400_000);
    }
}
