//! In-memory record store: one map per table behind a single `RwLock`, ids
//! from per-table atomic sequences. Critical sections never await, so every
//! store operation is atomic with respect to the others.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::{AppError, AppResult};
use crate::model::account::{Account, AccountStatus, AccountUpdate, NewAccount};
use crate::model::attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveUpdate, NewLeave};
use crate::model::payroll::{NewPayroll, PayrollRecord, PayrollUpdate};
use crate::models::RefreshSession;
use crate::store::Store;

#[derive(Default)]
struct Tables {
    accounts: HashMap<u64, Account>,
    /// lowercase username -> account id
    usernames: HashMap<String, u64>,
    attendance: HashMap<u64, AttendanceRecord>,
    /// (account id, date) -> attendance id; one record per account per date
    attendance_days: HashMap<(u64, NaiveDate), u64>,
    leaves: HashMap<u64, LeaveRequest>,
    payroll: HashMap<u64, PayrollRecord>,
    sessions: HashMap<String, RefreshSession>,
}

#[derive(Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
    account_seq: AtomicU64,
    attendance_seq: AtomicU64,
    leave_seq: AtomicU64,
    payroll_seq: AtomicU64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(seq: &AtomicU64) -> u64 {
        seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn tables(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn tables_mut(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_account(&self, new: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables_mut();
        let key = new.username.to_lowercase();
        if tables.usernames.contains_key(&key) {
            return Err(AppError::Conflict("Username"));
        }

        let id = Self::next(&self.account_seq);
        let account = Account {
            id,
            username: new.username,
            full_name: new.full_name,
            email: new.email,
            role: new.role,
            job_title: new.job_title,
            department: new.department,
            password: new.password,
            is_first_login: new.is_first_login,
            current_status: AccountStatus::Absent,
            last_check_in: None,
            last_check_out: None,
            created_at: Utc::now(),
        };
        tables.usernames.insert(key, id);
        tables.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: u64) -> AppResult<Option<Account>> {
        Ok(self.tables().accounts.get(&id).cloned())
    }

    async fn get_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let tables = self.tables();
        let id = tables.usernames.get(&username.to_lowercase());
        Ok(id.and_then(|id| tables.accounts.get(id)).cloned())
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<_> = self.tables().accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(accounts)
    }

    async fn update_account(&self, id: u64, update: AccountUpdate) -> AppResult<Account> {
        let mut tables = self.tables_mut();
        let account = tables
            .accounts
            .get_mut(&id)
            .ok_or(AppError::NotFound("Account"))?;

        if let Some(full_name) = update.full_name {
            account.full_name = full_name;
        }
        if let Some(email) = update.email {
            account.email = email;
        }
        if let Some(role) = update.role {
            account.role = role;
        }
        if let Some(job_title) = update.job_title {
            account.job_title = Some(job_title);
        }
        if let Some(department) = update.department {
            account.department = Some(department);
        }
        if let Some(password) = update.password {
            account.password = password;
        }
        if let Some(is_first_login) = update.is_first_login {
            account.is_first_login = is_first_login;
        }
        if let Some(status) = update.current_status {
            account.current_status = status;
        }
        if let Some(last_check_in) = update.last_check_in {
            account.last_check_in = last_check_in;
        }
        if let Some(last_check_out) = update.last_check_out {
            account.last_check_out = last_check_out;
        }
        Ok(account.clone())
    }

    async fn create_attendance(&self, new: NewAttendance) -> AppResult<AttendanceRecord> {
        let mut tables = self.tables_mut();
        if !tables.accounts.contains_key(&new.account_id) {
            return Err(AppError::NotFound("Account"));
        }
        let day_key = (new.account_id, new.date);
        if tables.attendance_days.contains_key(&day_key) {
            return Err(AppError::Conflict("Attendance record for this date"));
        }

        let id = Self::next(&self.attendance_seq);
        let record = AttendanceRecord {
            id,
            account_id: new.account_id,
            date: new.date,
            check_in: new.check_in,
            check_out: None,
            status: new.status,
            work_minutes: 0,
        };
        tables.attendance_days.insert(day_key, id);
        tables.attendance.insert(id, record.clone());
        Ok(record)
    }

    async fn attendance_on(
        &self,
        account_id: u64,
        date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>> {
        let tables = self.tables();
        let id = tables.attendance_days.get(&(account_id, date));
        Ok(id.and_then(|id| tables.attendance.get(id)).cloned())
    }

    async fn list_attendance(&self, account_id: Option<u64>) -> AppResult<Vec<AttendanceRecord>> {
        let tables = self.tables();
        let mut records: Vec<_> = tables
            .attendance
            .values()
            .filter(|r| account_id.is_none_or(|id| r.account_id == id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn update_attendance(
        &self,
        id: u64,
        update: AttendanceUpdate,
    ) -> AppResult<AttendanceRecord> {
        let mut tables = self.tables_mut();
        let record = tables
            .attendance
            .get_mut(&id)
            .ok_or(AppError::NotFound("Attendance record"))?;

        if let Some(check_in) = update.check_in {
            record.check_in = check_in;
        }
        if let Some(check_out) = update.check_out {
            record.check_out = check_out;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(work_minutes) = update.work_minutes {
            record.work_minutes = work_minutes;
        }
        Ok(record.clone())
    }

    async fn create_leave(&self, new: NewLeave) -> AppResult<LeaveRequest> {
        let mut tables = self.tables_mut();
        if !tables.accounts.contains_key(&new.account_id) {
            return Err(AppError::NotFound("Account"));
        }

        let id = Self::next(&self.leave_seq);
        let leave = LeaveRequest {
            id,
            account_id: new.account_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            days: (new.end_date - new.start_date).num_days() + 1,
            status: LeaveStatus::Pending,
            reason: new.reason,
            created_at: Utc::now(),
        };
        tables.leaves.insert(id, leave.clone());
        Ok(leave)
    }

    async fn get_leave(&self, id: u64) -> AppResult<Option<LeaveRequest>> {
        Ok(self.tables().leaves.get(&id).cloned())
    }

    async fn list_leaves(&self, account_id: Option<u64>) -> AppResult<Vec<LeaveRequest>> {
        let tables = self.tables();
        let mut leaves: Vec<_> = tables
            .leaves
            .values()
            .filter(|l| account_id.is_none_or(|id| l.account_id == id))
            .cloned()
            .collect();
        leaves.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(leaves)
    }

    async fn update_leave(&self, id: u64, update: LeaveUpdate) -> AppResult<LeaveRequest> {
        let mut tables = self.tables_mut();
        let leave = tables
            .leaves
            .get_mut(&id)
            .ok_or(AppError::NotFound("Leave request"))?;
        if let Some(status) = update.status {
            leave.status = status;
        }
        Ok(leave.clone())
    }

    async fn create_payroll(&self, new: NewPayroll) -> AppResult<PayrollRecord> {
        let mut tables = self.tables_mut();
        if !tables.accounts.contains_key(&new.account_id) {
            return Err(AppError::NotFound("Account"));
        }

        let id = Self::next(&self.payroll_seq);
        let record = PayrollRecord {
            id,
            account_id: new.account_id,
            period_start: new.period_start,
            period_end: new.period_end,
            base_salary: new.base_salary,
            bonus: new.bonus,
            deductions: new.deductions,
            net_pay: new.net_pay,
            status: new.status,
        };
        tables.payroll.insert(id, record.clone());
        Ok(record)
    }

    async fn get_payroll(&self, id: u64) -> AppResult<Option<PayrollRecord>> {
        Ok(self.tables().payroll.get(&id).cloned())
    }

    async fn list_payroll(&self, account_id: Option<u64>) -> AppResult<Vec<PayrollRecord>> {
        let tables = self.tables();
        let mut records: Vec<_> = tables
            .payroll
            .values()
            .filter(|p| account_id.is_none_or(|id| p.account_id == id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    async fn update_payroll(&self, id: u64, update: PayrollUpdate) -> AppResult<PayrollRecord> {
        let mut tables = self.tables_mut();
        let record = tables
            .payroll
            .get_mut(&id)
            .ok_or(AppError::NotFound("Payroll record"))?;

        if let Some(base_salary) = update.base_salary {
            record.base_salary = base_salary;
        }
        if let Some(bonus) = update.bonus {
            record.bonus = bonus;
        }
        if let Some(deductions) = update.deductions {
            record.deductions = deductions;
        }
        if let Some(net_pay) = update.net_pay {
            record.net_pay = net_pay;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        Ok(record.clone())
    }

    async fn insert_session(&self, session: RefreshSession) -> AppResult<()> {
        self.tables_mut()
            .sessions
            .insert(session.jti.clone(), session);
        Ok(())
    }

    async fn get_session(&self, jti: &str) -> AppResult<Option<RefreshSession>> {
        Ok(self.tables().sessions.get(jti).cloned())
    }

    async fn revoke_session(&self, jti: &str) -> AppResult<()> {
        if let Some(session) = self.tables_mut().sessions.get_mut(jti) {
            session.revoked = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::model::leave::LeaveType;
    use crate::model::role::Role;

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            full_name: format!("{username} person"),
            email: format!("{username}@dayflow.test"),
            role: Role::Employee,
            job_title: None,
            department: None,
            password: "hash".to_string(),
            is_first_login: false,
        }
    }

    #[tokio::test]
    async fn account_ids_are_sequential() {
        let store = MemStore::new();
        let a = store.create_account(new_account("a")).await.unwrap();
        let b = store.create_account(new_account("b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemStore::new();
        store.create_account(new_account("sarah")).await.unwrap();
        let err = store
            .create_account(new_account("Sarah"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn one_attendance_record_per_account_per_date() {
        let store = MemStore::new();
        let account = store.create_account(new_account("a")).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let new = NewAttendance {
            account_id: account.id,
            date,
            check_in: Some(Utc::now()),
            status: AttendanceStatus::Present,
        };
        store.create_attendance(new.clone()).await.unwrap();
        let err = store.create_attendance(new).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_with_some_none_clears_timestamps() {
        let store = MemStore::new();
        let account = store.create_account(new_account("a")).await.unwrap();
        store
            .update_account(
                account.id,
                AccountUpdate {
                    last_check_in: Some(Some(Utc::now())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let cleared = store
            .update_account(
                account.id,
                AccountUpdate {
                    last_check_in: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.last_check_in.is_none());
    }

    #[tokio::test]
    async fn leave_day_count_is_inclusive() {
        let store = MemStore::new();
        let account = store.create_account(new_account("a")).await.unwrap();
        let leave = store
            .create_leave(NewLeave {
                account_id: account.id,
                leave_type: LeaveType::Sick,
                start_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
                reason: None,
            })
            .await
            .unwrap();
        assert_eq!(leave.days, 3);
        assert_eq!(leave.status, LeaveStatus::Pending);
    }

    #[tokio::test]
    async fn update_unknown_account_is_not_found() {
        let store = MemStore::new();
        let err = store
            .update_account(42, AccountUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
