use axum::http::HeaderMap;

use backend_application::commands::auth_commands;
use backend_application::AppState;
use backend_domain::Claims;

use crate::error::HttpError;

/// Admin guard called at the top of every protected handler.
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Claims, HttpError> {
    let token = extract_bearer(headers).ok_or(HttpError::Unauthorized("missing bearer token"))?;
    auth_commands::verify_admin_token(state, &token)
        .map_err(|_| HttpError::Unauthorized("invalid or expired token"))
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_str(value).expect("header"));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")).as_deref(), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("  Bearer  abc ")).as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert!(extract_bearer(&headers("Basic YWRtaW4=")).is_none());
        assert!(extract_bearer(&headers("Bearer    ")).is_none());
        assert!(extract_bearer(&HeaderMap::new()).is_none());
    }
}
