use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::warn;

use crate::auth::policy::{self, Action};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::role::Role;
use crate::models::Claims;

/// Authenticated caller, decoded from the bearer token.
pub struct AuthUser {
    pub account_id: u64,
    pub username: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            account_id: data.claims.account_id,
            username: data.claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    /// Single authorization gate for every role-restricted operation.
    pub fn require(&self, action: Action) -> AppResult<()> {
        if policy::allows(self.role, action) {
            Ok(())
        } else {
            warn!(account_id = self.account_id, %action, "denied by policy");
            Err(AppError::Forbidden("Admin only"))
        }
    }

    /// True when the caller may see records owned by `account_id` under the
    /// given action: owners always can, otherwise the policy decides.
    pub fn can_view(&self, account_id: u64, action: Action) -> bool {
        self.account_id == account_id || policy::allows(self.role, action)
    }
}
