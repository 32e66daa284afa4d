//! Demo data for a fresh in-memory store: one admin, one employee, and a
//! little history so dashboards have something to show.

use anyhow::Context;
use chrono::{Duration, Local};
use tracing::info;

use crate::auth::password::hash_password;
use crate::model::account::NewAccount;
use crate::model::leave::{LeaveStatus, LeaveType, LeaveUpdate, NewLeave};
use crate::model::payroll::{NewPayroll, PayrollStatus};
use crate::model::role::Role;
use crate::store::Store;

pub async fn seed_demo_data(store: &dyn Store) -> anyhow::Result<()> {
    if !store.list_accounts().await?.is_empty() {
        return Ok(());
    }

    let admin = store
        .create_account(NewAccount {
            username: "admin".to_string(),
            full_name: "Admin User".to_string(),
            email: "admin@dayflow.com".to_string(),
            role: Role::Admin,
            job_title: Some("HR Manager".to_string()),
            department: Some("Human Resources".to_string()),
            password: hash_password("password123")?,
            is_first_login: false,
        })
        .await
        .context("seeding admin account")?;

    let employee = store
        .create_account(NewAccount {
            username: "sarah".to_string(),
            full_name: "Sarah Connor".to_string(),
            email: "sarah@dayflow.com".to_string(),
            role: Role::Employee,
            job_title: Some("Software Engineer".to_string()),
            department: Some("Engineering".to_string()),
            password: hash_password("password123")?,
            is_first_login: false,
        })
        .await
        .context("seeding employee account")?;

    // A decided leave in the past so the history page is not empty.
    let today = Local::now().date_naive();
    let leave = store
        .create_leave(NewLeave {
            account_id: employee.id,
            leave_type: LeaveType::Sick,
            start_date: today - Duration::days(30),
            end_date: today - Duration::days(29),
            reason: Some("Flu".to_string()),
        })
        .await?;
    store
        .update_leave(
            leave.id,
            LeaveUpdate {
                status: Some(LeaveStatus::Approved),
            },
        )
        .await?;

    let period_end = today - Duration::days(7);
    store
        .create_payroll(NewPayroll {
            account_id: employee.id,
            period_start: period_end - Duration::days(30),
            period_end,
            base_salary: 5000.0,
            bonus: 0.0,
            deductions: 0.0,
            net_pay: 5000.0,
            status: PayrollStatus::Paid,
        })
        .await?;

    info!(
        admin_id = admin.id,
        employee_id = employee.id,
        "seeded demo data"
    );
    Ok(())
}
