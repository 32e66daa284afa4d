use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::policy::{self, Action};
use crate::error::{AppError, AppResult};
use crate::model::account::AccountDto;
use crate::model::attendance::AttendanceRecord;
use crate::store::Store;
use crate::tracker::AttendanceTracker;

#[derive(Serialize, ToSchema)]
pub struct AttendanceActionResponse {
    #[schema(example = "Checked in successfully")]
    pub message: String,
    pub account: AccountDto,
    pub attendance: AttendanceRecord,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Filter by account ID (admin only for other accounts)
    #[schema(example = 2)]
    pub account_id: Option<u64>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u32>,
    /// Pagination per page number
    #[schema(example = 20)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceActionResponse),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
) -> AppResult<HttpResponse> {
    let (account, attendance) = tracker.check_in(auth.account_id).await?;

    Ok(HttpResponse::Ok().json(AttendanceActionResponse {
        message: "Checked in successfully".to_string(),
        account: account.into(),
        attendance,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceActionResponse),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
) -> AppResult<HttpResponse> {
    let (account, attendance) = tracker.check_out(auth.account_id).await?;

    Ok(HttpResponse::Ok().json(AttendanceActionResponse {
        message: "Checked out successfully".to_string(),
        account: account.into(),
        attendance,
    }))
}

/// List attendance records, newest first. Employees see their own history;
/// admins may filter by any account.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    query: web::Query<AttendanceQuery>,
) -> AppResult<HttpResponse> {
    let account_id = match query.account_id {
        Some(id) if auth.can_view(id, Action::ViewAllAttendance) => Some(id),
        Some(_) => return Err(AppError::Forbidden("Admin only")),
        None if policy::allows(auth.role, Action::ViewAllAttendance) => None,
        None => Some(auth.account_id),
    };

    let records = store.list_attendance(account_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let total = records.len() as i64;
    let data = records
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
