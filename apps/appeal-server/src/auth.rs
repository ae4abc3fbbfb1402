use crate::{error::AppError, AppState};
use appeal_shared::API_KEY_HEADER;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Rejects requests that do not carry the configured key in `X-API-Key`.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(req.headers(), &state.config.api_key)?;
    Ok(next.run(req).await)
}

pub fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingApiKey)?;

    if provided.as_bytes() != expected.as_bytes() {
        warn!("Invalid API key attempt: {}...", key_prefix(provided));
        return Err(AppError::InvalidApiKey);
    }

    Ok(())
}

fn key_prefix(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).chars().take(4).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderName;

    fn headers_with(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(key).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(matches!(
            authorize(&HeaderMap::new(), "secret"),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn empty_header_counts_as_missing() {
        assert!(matches!(
            authorize(&headers_with(""), "secret"),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn mismatched_key_is_forbidden() {
        assert!(matches!(
            authorize(&headers_with("secret "), "secret"),
            Err(AppError::InvalidApiKey)
        ));
        assert!(matches!(
            authorize(&headers_with("SECRET"), "secret"),
            Err(AppError::InvalidApiKey)
        ));
    }

    #[test]
    fn exact_key_passes() {
        assert!(authorize(&headers_with("secret"), "secret").is_ok());
    }

    #[test]
    fn header_name_lookup_ignores_case() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-API-KEY").unwrap(),
            HeaderValue::from_static("secret"),
        );
        assert!(authorize(&headers, "secret").is_ok());
    }
}
