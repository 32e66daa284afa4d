//! Record store port. Handlers and the attendance tracker only ever see the
//! [`Store`] trait; the in-memory implementation lives in [`memory`] and a
//! relational one can be slotted in behind the same interface.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;
use crate::model::account::{Account, AccountUpdate, NewAccount};
use crate::model::attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance};
use crate::model::leave::{LeaveRequest, LeaveUpdate, NewLeave};
use crate::model::payroll::{NewPayroll, PayrollRecord, PayrollUpdate};
use crate::models::RefreshSession;

pub use memory::MemStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Accounts
    async fn create_account(&self, new: NewAccount) -> AppResult<Account>;
    async fn get_account(&self, id: u64) -> AppResult<Option<Account>>;
    async fn get_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;
    /// Fails with `NotFound` for an unknown id.
    async fn update_account(&self, id: u64, update: AccountUpdate) -> AppResult<Account>;

    // Attendance
    /// Fails with `Conflict` when a record for (account, date) already
    /// exists; re-opening an existing day goes through `update_attendance`.
    async fn create_attendance(&self, new: NewAttendance) -> AppResult<AttendanceRecord>;
    async fn attendance_on(
        &self,
        account_id: u64,
        date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>>;
    async fn list_attendance(&self, account_id: Option<u64>) -> AppResult<Vec<AttendanceRecord>>;
    async fn update_attendance(
        &self,
        id: u64,
        update: AttendanceUpdate,
    ) -> AppResult<AttendanceRecord>;

    // Leave requests
    async fn create_leave(&self, new: NewLeave) -> AppResult<LeaveRequest>;
    async fn get_leave(&self, id: u64) -> AppResult<Option<LeaveRequest>>;
    async fn list_leaves(&self, account_id: Option<u64>) -> AppResult<Vec<LeaveRequest>>;
    async fn update_leave(&self, id: u64, update: LeaveUpdate) -> AppResult<LeaveRequest>;

    // Payroll
    async fn create_payroll(&self, new: NewPayroll) -> AppResult<PayrollRecord>;
    async fn get_payroll(&self, id: u64) -> AppResult<Option<PayrollRecord>>;
    async fn list_payroll(&self, account_id: Option<u64>) -> AppResult<Vec<PayrollRecord>>;
    async fn update_payroll(&self, id: u64, update: PayrollUpdate) -> AppResult<PayrollRecord>;

    // Refresh-token sessions
    async fn insert_session(&self, session: RefreshSession) -> AppResult<()>;
    async fn get_session(&self, jti: &str) -> AppResult<Option<RefreshSession>>;
    async fn revoke_session(&self, jti: &str) -> AppResult<()>;
}
