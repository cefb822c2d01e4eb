use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::caller::{CallerContext, Role};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
    #[serde(default)]
    pub institution_id: Option<String>,
}

impl Claims {
    pub fn into_caller(self) -> Option<CallerContext> {
        let role = Role::parse(self.role.as_deref()?)?;
        Some(CallerContext::new(self.sub, role, self.institution_id))
    }
}

fn unauthorized(code: &str) -> Response {
    Error::Unauthorized(code.to_string()).into_response()
}

/// Decodes the bearer token and attaches the caller to the request.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let claims = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(_) => return unauthorized("invalid_token"),
    };

    let Some(caller) = claims.into_caller() else {
        tracing::warn!("Token carries no recognised role");
        return Error::Authorization("unknown_role".to_string()).into_response();
    };
    req.extensions_mut().insert(caller);
    next.run(req).await
}
