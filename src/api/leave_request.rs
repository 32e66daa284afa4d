use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::policy::{self, Action};
use crate::error::{AppError, AppResult};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType, NewLeave};
use crate::store::Store;
use crate::tracker::AttendanceTracker;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-08-10", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-08-12", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "Flu")]
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by account ID (admin only for other accounts)
    #[schema(example = 2)]
    pub account_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u32>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<CreateLeave>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    if payload.start_date > payload.end_date {
        return Err(AppError::validation("start_date cannot be after end_date"));
    }

    let leave = store
        .create_leave(NewLeave {
            account_id: auth.account_id,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request submitted",
        "leave": leave
    })))
}

/* =========================
Approve leave (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require(Action::DecideLeave)?;

    let leave = tracker.apply_leave_decision(path.into_inner(), true).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave approved",
        "leave": leave
    })))
}

/* =========================
Reject leave (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Leave request already processed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require(Action::DecideLeave)?;

    let leave = tracker
        .apply_leave_decision(path.into_inner(), false)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave rejected",
        "leave": leave
    })))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let leave = store
        .get_leave(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Leave request"))?;

    if !auth.can_view(leave.account_id, Action::ViewAllLeaves) {
        return Err(AppError::Forbidden("Admin only"));
    }

    Ok(HttpResponse::Ok().json(leave))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    query: web::Query<LeaveFilter>,
) -> AppResult<HttpResponse> {
    let account_id = match query.account_id {
        Some(id) if auth.can_view(id, Action::ViewAllLeaves) => Some(id),
        Some(_) => return Err(AppError::Forbidden("Admin only")),
        None if policy::allows(auth.role, Action::ViewAllLeaves) => None,
        None => Some(auth.account_id),
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let leaves: Vec<LeaveRequest> = store
        .list_leaves(account_id)
        .await?
        .into_iter()
        .filter(|l| query.status.is_none_or(|s| l.status == s))
        .collect();

    let total = leaves.len() as i64;
    let data = leaves
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
