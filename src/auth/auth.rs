use crate::auth::jwt::verify_token;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// Staff identity resolved from the bearer token by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: u64,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Decodes an `Authorization` header value into the caller's identity.
    pub fn from_bearer(header: &str, secret: &str) -> Result<Self, String> {
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| "Authorization header must start with Bearer".to_string())?;

        let claims = verify_token(token, secret)?;
        let role = Role::from_id(claims.role).ok_or_else(|| "Invalid role".to_string())?;

        Ok(AuthUser {
            account_id: claims.account_id,
            username: claims.sub,
            role,
        })
    }

    /// Analytics and user management are reserved for staff and admins.
    pub fn require_staff(&self) -> actix_web::Result<()> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Staff only"))
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing token")),
        )
    }
}
