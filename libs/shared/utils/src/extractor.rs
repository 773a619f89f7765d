use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Query, SupabaseClient};
use shared_models::auth::{AccountRole, Principal};
use shared_models::error::AppError;

use crate::jwt::{validate_token, TOKEN_TTL_SECS};
use crate::password::without_password;

/// Name of the session cookie set on provider login.
pub const SESSION_COOKIE: &str = "token";

/// HttpOnly session cookie carrying `token`; `Secure` only in production.
pub fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS as i64))
        .build()
}

/// Token from the session cookie, falling back to `Authorization: Bearer`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Verifies the request's token and loads the account it names.
pub async fn authenticate(config: &AppConfig, headers: &HeaderMap) -> Result<Principal, AppError> {
    let token = extract_token(headers).ok_or_else(|| AppError::Auth("No token provided".to_string()))?;

    let identity = validate_token(&token, &config.jwt_secret).map_err(|e| {
        debug!("Rejected token: {}", e);
        AppError::Auth("Invalid or expired token".to_string())
    })?;

    let supabase = SupabaseClient::new(config);
    let account: Option<Value> = supabase
        .select_one(Query::table(identity.role.table()).eq("id", &identity.id))
        .await?;

    let account = account.ok_or_else(|| AppError::Auth("Invalid token".to_string()))?;

    Ok(Principal {
        id: identity.id,
        role: identity.role,
        email: identity.email,
        account: without_password(account),
    })
}

pub fn require_roles(principal: &Principal, allowed: &[AccountRole]) -> Result<(), AppError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} accounts cannot perform this action",
            principal.role
        )))
    }
}

pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = authenticate(&config, request.headers()).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Hospitals and clinics only.
pub async fn organization_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = authenticate(&config, request.headers()).await?;
    require_roles(&principal, &[AccountRole::Hospital, AccountRole::Clinic])?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Hospitals, clinics and doctors.
pub async fn provider_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = authenticate(&config, request.headers()).await?;
    require_roles(
        &principal,
        &[AccountRole::Hospital, AccountRole::Clinic, AccountRole::Doctor],
    )?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
