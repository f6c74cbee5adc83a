//! Bearer token authentication for the `/lumina` routes

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// API key from Shuttle secrets
static API_KEY: std::sync::OnceLock<String> = std::sync::OnceLock::new();

/// Set the API key once at startup
pub fn init_api_key(key: String) {
    let _ = API_KEY.set(key);
}

fn configured_key() -> Option<&'static str> {
    API_KEY.get().map(String::as_str).filter(|k| !k.is_empty())
}

/// Why a request was refused
#[derive(Debug, PartialEq, Eq)]
enum AuthFailure {
    MissingHeader,
    MalformedHeader,
    WrongKey,
}

fn check_bearer(header: Option<&str>, api_key: &str) -> Result<(), AuthFailure> {
    let header = header.ok_or(AuthFailure::MissingHeader)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthFailure::MalformedHeader)?;
    if token.trim() == api_key {
        Ok(())
    } else {
        Err(AuthFailure::WrongKey)
    }
}

/// Authentication middleware.
///
/// Without a configured key every request passes (local development).
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let Some(api_key) = configured_key() else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match check_bearer(auth_header, api_key) {
        Ok(()) => Ok(next.run(request).await),
        Err(failure) => {
            tracing::warn!("Rejected {} {}: {:?}", request.method(), request.uri().path(), failure);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bearer() {
        assert_eq!(check_bearer(Some("Bearer k1"), "k1"), Ok(()));
        assert_eq!(check_bearer(Some("Bearer k2"), "k1"), Err(AuthFailure::WrongKey));
        assert_eq!(check_bearer(Some("Basic k1"), "k1"), Err(AuthFailure::MalformedHeader));
        assert_eq!(check_bearer(None, "k1"), Err(AuthFailure::MissingHeader));
    }
}
