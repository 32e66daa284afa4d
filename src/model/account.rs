use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::model::role::Role;

/// Current presence of an account, recomputed by check-in/check-out and the
/// daily reset sweep.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccountStatus {
    Present,
    Absent,
    OnLeave,
}

/// A user of the system, admin or employee. The root entity: attendance,
/// leave and payroll rows all point back at an account id.
///
/// Deliberately not `Serialize` — the password hash must never reach a
/// response body. Use [`AccountDto`] for anything leaving the process.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub job_title: Option<String>,
    pub department: Option<String>,
    /// Argon2 hash, never the plain password.
    pub password: String,
    pub is_first_login: bool,
    pub current_status: AccountStatus,
    pub last_check_in: Option<DateTime<Utc>>,
    pub last_check_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Serializable view of an [`Account`] with the credential stripped.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountDto {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "sarah")]
    pub username: String,
    #[schema(example = "Sarah Connor")]
    pub full_name: String,
    #[schema(example = "sarah@dayflow.com", format = "email", value_type = String)]
    pub email: String,
    pub role: Role,
    #[schema(example = "Software Engineer", nullable = true)]
    pub job_title: Option<String>,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    pub is_first_login: bool,
    pub current_status: AccountStatus,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_check_in: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_check_out: Option<DateTime<Utc>>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        AccountDto {
            id: account.id,
            username: account.username,
            full_name: account.full_name,
            email: account.email,
            role: account.role,
            job_title: account.job_title,
            department: account.department,
            is_first_login: account.is_first_login,
            current_status: account.current_status,
            last_check_in: account.last_check_in,
            last_check_out: account.last_check_out,
            created_at: account.created_at,
        }
    }
}

/// Fields for account creation. `password` is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub password: String,
    pub is_first_login: bool,
}

/// Partial account update. `None` leaves a field untouched; for the nullable
/// timestamp fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub password: Option<String>,
    pub is_first_login: Option<bool>,
    pub current_status: Option<AccountStatus>,
    pub last_check_in: Option<Option<DateTime<Utc>>>,
    pub last_check_out: Option<Option<DateTime<Utc>>>,
}
