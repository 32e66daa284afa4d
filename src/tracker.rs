//! Attendance state tracker: the single current status of every account plus
//! the daily attendance audit trail.
//!
//! Status machine: check-in moves any state to `present`; check-out moves
//! `present` to `absent`; a leave approval moves any state to `on-leave`; the
//! daily reset recomputes `on-leave`/`absent` from scratch. At most one open
//! session (checked in, not checked out) exists per account per day.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::model::account::{Account, AccountStatus, AccountUpdate};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewAttendance};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveUpdate};
use crate::notify::{StatusEvent, StatusNotifier};
use crate::store::Store;

#[derive(Clone)]
pub struct AttendanceTracker {
    store: Arc<dyn Store>,
    notifier: Arc<dyn StatusNotifier>,
}

/// Server-local calendar date; attendance days roll over at local midnight,
/// together with the reset sweep.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn work_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    (check_out - check_in).num_minutes().max(0)
}

impl AttendanceTracker {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn StatusNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Open today's session for `account_id`.
    ///
    /// Re-checking-in after a check-out reopens the same record for the day,
    /// clearing the previous check-out.
    pub async fn check_in(&self, account_id: u64) -> AppResult<(Account, AttendanceRecord)> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(AppError::NotFound("Account"))?;

        let date = today();
        let now = Utc::now();
        let existing = self.store.attendance_on(account_id, date).await?;

        if let Some(record) = &existing {
            if record.check_in.is_some() && record.check_out.is_none() {
                return Err(AppError::AlreadyCheckedIn);
            }
        }

        let record = match existing {
            Some(record) => {
                self.store
                    .update_attendance(
                        record.id,
                        AttendanceUpdate {
                            check_in: Some(Some(now)),
                            check_out: Some(None),
                            status: Some(AttendanceStatus::Present),
                            work_minutes: Some(0),
                        },
                    )
                    .await?
            }
            None => {
                self.store
                    .create_attendance(NewAttendance {
                        account_id,
                        date,
                        check_in: Some(now),
                        status: AttendanceStatus::Present,
                    })
                    .await?
            }
        };

        let account = self
            .store
            .update_account(
                account_id,
                AccountUpdate {
                    current_status: Some(AccountStatus::Present),
                    last_check_in: Some(Some(now)),
                    ..Default::default()
                },
            )
            .await?;

        self.notifier.emit(StatusEvent::StatusChanged {
            account_id,
            status: AccountStatus::Present,
            timestamp: now,
        });
        self.notifier.emit(StatusEvent::CheckedIn {
            account_id,
            timestamp: now,
        });

        info!(account_id, "checked in");
        Ok((account, record))
    }

    /// Close today's open session for `account_id`.
    pub async fn check_out(&self, account_id: u64) -> AppResult<(Account, AttendanceRecord)> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(AppError::NotFound("Account"))?;

        let now = Utc::now();
        let record = self
            .store
            .attendance_on(account_id, today())
            .await?
            .ok_or(AppError::NoCheckInFound)?;

        let Some(checked_in) = record.check_in else {
            return Err(AppError::NoCheckInFound);
        };
        if record.check_out.is_some() {
            return Err(AppError::AlreadyCheckedOut);
        }

        let record = self
            .store
            .update_attendance(
                record.id,
                AttendanceUpdate {
                    check_out: Some(Some(now)),
                    work_minutes: Some(work_minutes(checked_in, now)),
                    ..Default::default()
                },
            )
            .await?;

        let account = self
            .store
            .update_account(
                account_id,
                AccountUpdate {
                    current_status: Some(AccountStatus::Absent),
                    last_check_out: Some(Some(now)),
                    ..Default::default()
                },
            )
            .await?;

        self.notifier.emit(StatusEvent::StatusChanged {
            account_id,
            status: AccountStatus::Absent,
            timestamp: now,
        });
        self.notifier.emit(StatusEvent::CheckedOut {
            account_id,
            timestamp: now,
        });

        info!(account_id, work_minutes = record.work_minutes, "checked out");
        Ok((account, record))
    }

    /// Full-table daily sweep: every account becomes `on-leave` when an
    /// approved leave covers today, otherwise `absent`; the check-in/out
    /// timestamps are cleared either way. Per-account failures are logged
    /// and skipped so one bad row cannot abort the rest of the sweep.
    pub async fn reset_all_statuses(&self) -> AppResult<()> {
        let date = today();
        let accounts = self.store.list_accounts().await?;
        let leaves = self.store.list_leaves(None).await?;

        let on_leave: HashSet<u64> = leaves
            .iter()
            .filter(|leave| leave.covers(date))
            .map(|leave| leave.account_id)
            .collect();

        let total = accounts.len();
        let mut reset = 0usize;
        for account in accounts {
            let status = if on_leave.contains(&account.id) {
                AccountStatus::OnLeave
            } else {
                AccountStatus::Absent
            };
            let update = AccountUpdate {
                current_status: Some(status),
                last_check_in: Some(None),
                last_check_out: Some(None),
                ..Default::default()
            };
            match self.store.update_account(account.id, update).await {
                Ok(_) => {
                    debug!(account_id = account.id, status = %status, "status reset");
                    reset += 1;
                }
                Err(e) => {
                    warn!(error = %e, account_id = account.id, "skipping account in daily reset");
                }
            }
        }

        info!(reset, total, "daily status reset complete");
        Ok(())
    }

    /// Decide a pending leave request. Approval also moves the owning
    /// account to `on-leave` and notifies observers; rejection changes only
    /// the request itself.
    pub async fn apply_leave_decision(
        &self,
        leave_id: u64,
        approved: bool,
    ) -> AppResult<LeaveRequest> {
        let leave = self
            .store
            .get_leave(leave_id)
            .await?
            .ok_or(AppError::NotFound("Leave request"))?;
        if leave.status != LeaveStatus::Pending {
            return Err(AppError::LeaveAlreadyDecided);
        }

        let status = if approved {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Rejected
        };
        let leave = self
            .store
            .update_leave(
                leave_id,
                LeaveUpdate {
                    status: Some(status),
                },
            )
            .await?;

        if approved {
            self.store
                .update_account(
                    leave.account_id,
                    AccountUpdate {
                        current_status: Some(AccountStatus::OnLeave),
                        ..Default::default()
                    },
                )
                .await?;
            self.notifier.emit(StatusEvent::StatusChanged {
                account_id: leave.account_id,
                status: AccountStatus::OnLeave,
                timestamp: Utc::now(),
            });
        }

        Ok(leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone};

    use crate::model::account::NewAccount;
    use crate::model::leave::{LeaveType, NewLeave};
    use crate::model::role::Role;
    use crate::store::MemStore;

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<StatusEvent>>);

    impl RecordingNotifier {
        fn events(&self) -> Vec<StatusEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    impl StatusNotifier for RecordingNotifier {
        fn emit(&self, event: StatusEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    async fn setup() -> (AttendanceTracker, Arc<MemStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(MemStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = AttendanceTracker::new(store.clone(), notifier.clone());
        (tracker, store, notifier)
    }

    async fn employee(store: &MemStore, username: &str) -> u64 {
        store
            .create_account(NewAccount {
                username: username.to_string(),
                full_name: username.to_string(),
                email: format!("{username}@dayflow.test"),
                role: Role::Employee,
                job_title: None,
                department: None,
                password: "hash".to_string(),
                is_first_login: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn check_in_marks_account_present() {
        let (tracker, store, notifier) = setup().await;
        let id = employee(&store, "sarah").await;

        let (account, record) = tracker.check_in(id).await.unwrap();

        assert_eq!(account.current_status, AccountStatus::Present);
        assert!(account.last_check_in.is_some());
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.check_in.is_some());
        assert!(record.check_out.is_none());

        let events = notifier.events();
        assert!(matches!(events[0], StatusEvent::StatusChanged { .. }));
        assert!(matches!(events[1], StatusEvent::CheckedIn { .. }));
    }

    #[tokio::test]
    async fn double_check_in_is_rejected() {
        let (tracker, store, _) = setup().await;
        let id = employee(&store, "sarah").await;

        tracker.check_in(id).await.unwrap();
        let err = tracker.check_in(id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCheckedIn));
    }

    #[tokio::test]
    async fn check_out_without_check_in_is_rejected() {
        let (tracker, store, _) = setup().await;
        let id = employee(&store, "sarah").await;

        let err = tracker.check_out(id).await.unwrap_err();
        assert!(matches!(err, AppError::NoCheckInFound));
    }

    #[tokio::test]
    async fn check_out_closes_the_session() {
        let (tracker, store, notifier) = setup().await;
        let id = employee(&store, "sarah").await;

        tracker.check_in(id).await.unwrap();
        let (account, record) = tracker.check_out(id).await.unwrap();

        assert_eq!(account.current_status, AccountStatus::Absent);
        assert!(account.last_check_out.is_some());
        assert!(record.check_out.is_some());
        assert!(record.work_minutes >= 0);

        let err = tracker.check_out(id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCheckedOut));

        let events = notifier.events();
        assert!(matches!(events.last(), Some(StatusEvent::CheckedOut { .. })));
    }

    #[tokio::test]
    async fn re_check_in_reopens_the_same_record() {
        let (tracker, store, _) = setup().await;
        let id = employee(&store, "sarah").await;

        let (_, first) = tracker.check_in(id).await.unwrap();
        tracker.check_out(id).await.unwrap();
        let (_, reopened) = tracker.check_in(id).await.unwrap();

        assert_eq!(reopened.id, first.id);
        assert!(reopened.check_out.is_none());
        assert_eq!(reopened.work_minutes, 0);
        assert_eq!(reopened.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn check_in_for_unknown_account_is_not_found() {
        let (tracker, _, _) = setup().await;
        let err = tracker.check_in(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn reset_clears_timestamps_and_recomputes_status() {
        let (tracker, store, _) = setup().await;
        let on_leave_id = employee(&store, "ana").await;
        let working_id = employee(&store, "bo").await;

        tracker.check_in(working_id).await.unwrap();

        let date = today();
        let leave = store
            .create_leave(NewLeave {
                account_id: on_leave_id,
                leave_type: LeaveType::Annual,
                start_date: date - Duration::days(1),
                end_date: date + Duration::days(1),
                reason: None,
            })
            .await
            .unwrap();
        tracker.apply_leave_decision(leave.id, true).await.unwrap();

        tracker.reset_all_statuses().await.unwrap();

        let ana = store.get_account(on_leave_id).await.unwrap().unwrap();
        assert_eq!(ana.current_status, AccountStatus::OnLeave);
        assert!(ana.last_check_in.is_none());
        assert!(ana.last_check_out.is_none());

        let bo = store.get_account(working_id).await.unwrap().unwrap();
        assert_eq!(bo.current_status, AccountStatus::Absent);
        assert!(bo.last_check_in.is_none());
    }

    #[tokio::test]
    async fn expired_leave_resets_to_absent() {
        let (tracker, store, _) = setup().await;
        let id = employee(&store, "ana").await;

        let date = today();
        let leave = store
            .create_leave(NewLeave {
                account_id: id,
                leave_type: LeaveType::Sick,
                start_date: date - Duration::days(5),
                end_date: date - Duration::days(3),
                reason: None,
            })
            .await
            .unwrap();
        tracker.apply_leave_decision(leave.id, true).await.unwrap();

        tracker.reset_all_statuses().await.unwrap();

        let ana = store.get_account(id).await.unwrap().unwrap();
        assert_eq!(ana.current_status, AccountStatus::Absent);
    }

    #[tokio::test]
    async fn approving_leave_sets_on_leave_immediately() {
        let (tracker, store, notifier) = setup().await;
        let id = employee(&store, "ana").await;

        let date = today();
        let leave = store
            .create_leave(NewLeave {
                account_id: id,
                leave_type: LeaveType::Annual,
                start_date: date,
                end_date: date + Duration::days(2),
                reason: Some("trip".to_string()),
            })
            .await
            .unwrap();

        let decided = tracker.apply_leave_decision(leave.id, true).await.unwrap();
        assert_eq!(decided.status, LeaveStatus::Approved);

        let account = store.get_account(id).await.unwrap().unwrap();
        assert_eq!(account.current_status, AccountStatus::OnLeave);
        assert!(matches!(
            notifier.events().last(),
            Some(StatusEvent::StatusChanged {
                status: AccountStatus::OnLeave,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rejecting_leave_does_not_touch_account_status() {
        let (tracker, store, notifier) = setup().await;
        let id = employee(&store, "ana").await;

        let leave = store
            .create_leave(NewLeave {
                account_id: id,
                leave_type: LeaveType::Unpaid,
                start_date: today(),
                end_date: today(),
                reason: None,
            })
            .await
            .unwrap();

        let decided = tracker.apply_leave_decision(leave.id, false).await.unwrap();
        assert_eq!(decided.status, LeaveStatus::Rejected);
        assert_eq!(
            store
                .get_account(id)
                .await
                .unwrap()
                .unwrap()
                .current_status,
            AccountStatus::Absent
        );
        assert!(notifier.events().is_empty());

        let err = tracker.apply_leave_decision(leave.id, true).await.unwrap_err();
        assert!(matches!(err, AppError::LeaveAlreadyDecided));
    }

    #[test]
    fn work_minutes_for_a_nine_to_five_day() {
        let check_in = Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2026, 8, 7, 17, 0, 0).unwrap();
        assert_eq!(work_minutes(check_in, check_out), 480);
    }

    #[test]
    fn work_minutes_never_goes_negative() {
        let check_in = Utc.with_ymd_and_hms(2026, 8, 7, 17, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        assert_eq!(work_minutes(check_in, check_out), 0);
    }
}
