//! Daily reset scheduler: sleeps to the next local midnight, runs the status
//! sweep, repeats. A failed sweep is logged and swallowed; the next run is
//! unaffected. Runs missed while the process was down are skipped, never
//! backfilled.

use chrono::{DateTime, Local, NaiveTime};
use std::time::Duration;
use tracing::{error, info};

use crate::tracker::AttendanceTracker;

pub fn spawn_daily_reset(tracker: AttendanceTracker) {
    actix_web::rt::spawn(async move {
        info!("daily reset scheduler started, next run at local midnight");
        loop {
            tokio::time::sleep(until_next_midnight(Local::now())).await;
            info!("running daily status reset");
            if let Err(e) = tracker.reset_all_statuses().await {
                error!(error = %e, "daily status reset failed");
            }
        }
    });
}

fn until_next_midnight(now: DateTime<Local>) -> Duration {
    let next = now
        .date_naive()
        .succ_opt()
        .unwrap_or(now.date_naive())
        .and_time(NaiveTime::MIN);
    // DST gaps can make the naive subtraction come out non-positive; retry
    // in a minute rather than spinning.
    (next - now.naive_local())
        .to_std()
        .unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wait_is_positive_and_at_most_a_day() {
        let wait = until_next_midnight(Local::now());
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn wait_from_just_before_midnight_is_short() {
        let now = Local.with_ymd_and_hms(2026, 8, 7, 23, 59, 0).unwrap();
        let wait = until_next_midnight(now);
        assert_eq!(wait, Duration::from_secs(60));
    }
}
