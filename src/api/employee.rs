use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::auth::policy::Action;
use crate::error::{AppError, AppResult};
use crate::model::account::{AccountDto, AccountStatus, AccountUpdate, NewAccount};
use crate::model::role::Role;
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "sarah")]
    pub username: String,
    #[schema(example = "Temp1234!")]
    pub password: String,
    #[schema(example = "Sarah Connor")]
    pub full_name: String,
    #[schema(example = "sarah@dayflow.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Software Engineer")]
    pub job_title: Option<String>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    /// Defaults to `employee`.
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub full_name: Option<String>,
    #[schema(format = "email", value_type = Option<String>)]
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by department
    pub department: Option<String>,
    /// Filter by current status
    pub status: Option<AccountStatus>,
    /// Search by name, username or email
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<AccountDto>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee (admin provisioning; the account lands with the
/// first-login flag set so the owner is prompted to change the password)
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = AccountDto),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Username already exists", body = Object, example = json!({
            "message": "Username already exists"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<CreateEmployee>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ManageAccounts)?;

    let payload = payload.into_inner();
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation(
            "Username and password must not be empty",
        ));
    }

    let account = store
        .create_account(NewAccount {
            username,
            full_name: payload.full_name,
            email: payload.email,
            role: payload.role.unwrap_or(Role::Employee),
            job_title: payload.job_title,
            department: payload.department,
            password: hash_password(&payload.password)?,
            is_first_login: true,
        })
        .await?;

    info!(account_id = account.id, "employee created");
    Ok(HttpResponse::Created().json(AccountDto::from(account)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    query: web::Query<EmployeeQuery>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ViewAccounts)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let search = query.search.as_deref().map(str::to_lowercase);

    let accounts: Vec<AccountDto> = store
        .list_accounts()
        .await?
        .into_iter()
        .filter(|a| {
            query
                .department
                .as_deref()
                .is_none_or(|d| a.department.as_deref() == Some(d))
        })
        .filter(|a| query.status.is_none_or(|s| a.current_status == s))
        .filter(|a| {
            search.as_deref().is_none_or(|needle| {
                a.full_name.to_lowercase().contains(needle)
                    || a.username.to_lowercase().contains(needle)
                    || a.email.to_lowercase().contains(needle)
            })
        })
        .map(AccountDto::from)
        .collect();

    let total = accounts.len() as i64;
    let data = accounts
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee account ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = AccountDto),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Account not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ViewAccounts)?;

    let account = store
        .get_account(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    Ok(HttpResponse::Ok().json(AccountDto::from(account)))
}

/// Update Employee profile fields
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee account ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = AccountDto),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> AppResult<HttpResponse> {
    auth.require(Action::ManageAccounts)?;

    let payload = payload.into_inner();
    let account = store
        .update_account(
            path.into_inner(),
            AccountUpdate {
                full_name: payload.full_name,
                email: payload.email,
                job_title: payload.job_title,
                department: payload.department,
                role: payload.role,
                ..Default::default()
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully",
        "account": AccountDto::from(account)
    })))
}
