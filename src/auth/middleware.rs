use crate::auth::auth::AuthUser;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use tracing::debug;

/// Resolves the bearer token once per request and stores the `AuthUser`
/// for handlers to extract.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let resolved = match req.headers().get("Authorization") {
        None => Err("Missing Authorization header".to_string()),
        Some(value) => match value.to_str() {
            Ok(header) => AuthUser::from_bearer(header, &config.jwt_secret),
            Err(_) => Err("Invalid Authorization header encoding".to_string()),
        },
    };

    match resolved {
        Ok(auth_user) => {
            req.extensions_mut().insert(auth_user);
            next.call(req).await
        }
        Err(reason) => {
            debug!(path = req.path(), %reason, "Rejected request");
            let resp = HttpResponse::Unauthorized().json(json!({ "error": reason }));
            Ok(req.into_response(resp.map_into_boxed_body()))
        }
    }
}
