use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::account::{AccountDto, AccountUpdate, NewAccount};
use crate::model::role::Role;
use crate::models::{ChangePasswordReq, Claims, LoginReq, RefreshSession, RegisterReq, TokenType};
use crate::store::Store;

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountDto,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn session_from(claims: &Claims) -> RefreshSession {
    RefreshSession {
        jti: claims.jti.clone(),
        account_id: claims.account_id,
        expires_at: DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)
            .unwrap_or_else(Utc::now),
        revoked: false,
    }
}

/// Public self-registration; always creates an employee account. Admin
/// provisioning goes through the employees API instead.
pub async fn register(
    store: web::Data<dyn Store>,
    payload: web::Json<RegisterReq>,
) -> AppResult<HttpResponse> {
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
            role: Role::Employee,
            job_title: None,
            department: None,
            password: hash_password(&payload.password)?,
            is_first_login: false,
        })
        .await?;

    info!(account_id = account.id, "account registered");
    Ok(HttpResponse::Created().json(json!({
        "message": "Account registered successfully",
        "account": AccountDto::from(account)
    })))
}

#[instrument(
    name = "auth_login",
    skip(store, config, payload),
    fields(username = %payload.username)
)]
pub async fn login(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    payload: web::Json<LoginReq>,
) -> AppResult<HttpResponse> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Username or password required"));
    }

    let account = store
        .get_account_by_username(payload.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &account.password) {
        info!("invalid credentials: password mismatch");
        return Err(AppError::Unauthorized);
    }

    let access_token = generate_access_token(
        account.id,
        account.username.clone(),
        account.role.as_id(),
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        account.id,
        account.username.clone(),
        account.role.as_id(),
        &config.jwt_secret,
        config.refresh_token_ttl,
    );
    store.insert_session(session_from(&refresh_claims)).await?;

    info!(account_id = account.id, "login successful");
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        account: account.into(),
    }))
}

/// Rotate a refresh token: revoke the presented one, issue a new pair.
pub async fn refresh_token(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;
    let claims = verify_token(token, &config.jwt_secret).map_err(|_| AppError::Unauthorized)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized);
    }

    let session = store
        .get_session(&claims.jti)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if session.revoked || session.expires_at < Utc::now() {
        return Err(AppError::Unauthorized);
    }

    store.revoke_session(&claims.jti).await?;

    let (refresh_token, new_claims) = generate_refresh_token(
        claims.account_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );
    store.insert_session(session_from(&new_claims)).await?;

    let access_token = generate_access_token(
        claims.account_id,
        claims.sub,
        claims.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    Ok(HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token
    })))
}

/// Revoke the presented refresh token. Succeeds even when the token is
/// unknown or already revoked.
pub async fn logout(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(HttpResponse::NoContent().finish());
    };
    let Ok(claims) = verify_token(token, &config.jwt_secret) else {
        return Ok(HttpResponse::NoContent().finish());
    };

    if claims.token_type == TokenType::Refresh {
        store.revoke_session(&claims.jti).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Change the caller's own password; clears the first-login flag so
/// provisioned accounts stop being prompted.
pub async fn change_password(
    auth: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<ChangePasswordReq>,
) -> AppResult<HttpResponse> {
    let account = store
        .get_account(auth.account_id)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    if !verify_password(&payload.current_password, &account.password) {
        return Err(AppError::Unauthorized);
    }
    if payload.new_password.len() < 8 {
        return Err(AppError::validation(
            "New password must be at least 8 characters",
        ));
    }

    store
        .update_account(
            auth.account_id,
            AccountUpdate {
                password: Some(hash_password(&payload.new_password)?),
                is_first_login: Some(false),
                ..Default::default()
            },
        )
        .await?;

    info!(account_id = auth.account_id, "password changed");
    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed" })))
}
