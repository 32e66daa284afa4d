use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
}

/// One row per account per calendar date. A record with `check_in` set and
/// `check_out` empty is an open session; at most one exists per account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 2)]
    pub account_id: u64,
    #[schema(example = "2026-08-07", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    /// Minutes between check-in and check-out, computed at check-out time.
    #[schema(example = 480)]
    pub work_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub account_id: u64,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

/// Partial attendance update; `Some(None)` clears a timestamp.
#[derive(Debug, Clone, Default)]
pub struct AttendanceUpdate {
    pub check_in: Option<Option<DateTime<Utc>>>,
    pub check_out: Option<Option<DateTime<Utc>>>,
    pub status: Option<AttendanceStatus>,
    pub work_minutes: Option<i64>,
}
