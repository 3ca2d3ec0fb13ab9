//! Lead-time and run-time formatting for chart captions.

use chrono::{DateTime, Duration, Utc};

/// Forecast run (initialization) time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunTime(pub DateTime<Utc>);

impl RunTime {
    /// Caption fragment, e.g. `run 2026-08-06 00Z`.
    pub fn caption(&self) -> String {
        format!("run {}", self.0.format("%Y-%m-%d %HZ"))
    }
}

/// Valid time for a run plus a lead time in hours.
pub fn valid_time(run: RunTime, lead_hours: f32) -> DateTime<Utc> {
    run.0 + Duration::minutes((lead_hours * 60.0).round() as i64)
}

/// Axis label for a lead time in hours, e.g. `+18 h`.
pub fn lead_time_label(hours: f32) -> String {
    if hours.fract().abs() < 1e-3 {
        format!("+{:.0} h", hours)
    } else {
        format!("+{:.1} h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lead_time_label() {
        assert_eq!(lead_time_label(18.0), "+18 h");
        assert_eq!(lead_time_label(1.5), "+1.5 h");
    }

    #[test]
    fn test_valid_time() {
        let run = RunTime(Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap());
        let valid = valid_time(run, 36.0);
        assert_eq!(valid, Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap());
        assert_eq!(run.caption(), "run 2026-08-06 00Z");
    }
}
