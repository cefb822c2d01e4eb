use chrono::Duration;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::caller::CallerContext;

/// Signs an HS256 bearer token carrying the caller's role and institution.
pub fn issue_access_token(secret: &str, caller: &CallerContext, ttl: Duration) -> Result<String> {
    let exp = (super::time::now() + ttl).timestamp();
    let claims = Claims {
        sub: caller.user_id.clone(),
        exp: exp.max(0) as usize,
        role: Some(caller.role.as_str().to_string()),
        institution_id: caller.institution_id.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}
