use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::policy::{self, Action};
use crate::error::{AppError, AppResult};
use crate::model::payroll::{NewPayroll, PayrollRecord, PayrollStatus, PayrollUpdate};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreatePayroll {
    #[schema(example = 2)]
    pub account_id: u64,

    #[schema(example = "2026-07-01", value_type = String, format = "date")]
    pub period_start: NaiveDate,

    #[schema(example = "2026-07-31", value_type = String, format = "date")]
    pub period_end: NaiveDate,

    #[schema(example = 5000.0)]
    pub base_salary: f64,

    #[schema(example = 500.0)]
    pub bonus: Option<f64>,

    #[schema(example = 200.0)]
    pub deductions: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePayroll {
    #[schema(example = 5200.0)]
    pub base_salary: Option<f64>,

    #[schema(example = 600.0)]
    pub bonus: Option<f64>,

    #[schema(example = 250.0)]
    pub deductions: Option<f64>,

    #[schema(example = "paid")]
    pub status: Option<PayrollStatus>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 2)]
    pub account_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll created", body = PayrollRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn create_payroll(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<CreatePayroll>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ManagePayroll)?;

    let payload = payload.into_inner();
    if payload.period_start > payload.period_end {
        return Err(AppError::validation(
            "period_start cannot be after period_end",
        ));
    }

    let bonus = payload.bonus.unwrap_or(0.0);
    let deductions = payload.deductions.unwrap_or(0.0);
    let record = store
        .create_payroll(NewPayroll {
            account_id: payload.account_id,
            period_start: payload.period_start,
            period_end: payload.period_end,
            base_salary: payload.base_salary,
            bonus,
            deductions,
            net_pay: payload.base_salary + bonus - deductions,
            status: PayrollStatus::Unpaid,
        })
        .await?;

    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    request_body = UpdatePayroll,
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll updated", body = PayrollRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<UpdatePayroll>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ManagePayroll)?;

    let payroll_id = path.into_inner();
    let current = store
        .get_payroll(payroll_id)
        .await?
        .ok_or(AppError::NotFound("Payroll record"))?;

    let base_salary = payload.base_salary.unwrap_or(current.base_salary);
    let bonus = payload.bonus.unwrap_or(current.bonus);
    let deductions = payload.deductions.unwrap_or(current.deductions);

    let record = store
        .update_payroll(
            payroll_id,
            PayrollUpdate {
                base_salary: Some(base_salary),
                bonus: Some(bonus),
                deductions: Some(deductions),
                net_pay: Some(base_salary + bonus - deductions),
                status: payload.status,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let record = store
        .get_payroll(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Payroll record"))?;

    if !auth.can_view(record.account_id, Action::ViewAllPayroll) {
        return Err(AppError::Forbidden("Admin only"));
    }

    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    query: web::Query<PayrollQuery>,
) -> AppResult<HttpResponse> {
    let account_id = match query.account_id {
        Some(id) if auth.can_view(id, Action::ViewAllPayroll) => Some(id),
        Some(_) => return Err(AppError::Forbidden("Admin only")),
        None if policy::allows(auth.role, Action::ViewAllPayroll) => None,
        None => Some(auth.account_id),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let records = store.list_payroll(account_id).await?;
    let total = records.len() as i64;
    let data = records
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}
