/// Credential extraction from the Authorization header
use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

pub const BEARER_PREFIX: &str = "Bearer ";
pub const API_KEY_PREFIX: &str = "ApiKey ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Missing or malformed {scheme} authorization header")]
    MissingOrMalformed { scheme: &'static str },
}

/// Token presented with the `Bearer ` scheme
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_with_prefix(headers, BEARER_PREFIX, "Bearer")
}

/// Key presented with the `ApiKey ` scheme
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, CredentialError> {
    extract_with_prefix(headers, API_KEY_PREFIX, "ApiKey")
}

/// Everything after the exact, case-sensitive prefix. No trimming beyond the
/// single separator space that is part of the prefix.
fn extract_with_prefix(
    headers: &HeaderMap,
    prefix: &str,
    scheme: &'static str,
) -> Result<String, CredentialError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(prefix))
        .map(str::to_string)
        .ok_or(CredentialError::MissingOrMalformed { scheme })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&headers_with("Bearer mytoken")).unwrap(), "mytoken");
    }

    #[test]
    fn test_bearer_without_content_fails() {
        assert!(extract_bearer(&headers_with("Bearer")).is_err());
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_bearer_prefix_is_case_sensitive() {
        assert!(extract_bearer(&headers_with("bearer mytoken")).is_err());
        assert!(extract_bearer(&headers_with("BEARER mytoken")).is_err());
        assert!(extract_bearer(&headers_with("ApiKey mytoken")).is_err());
    }

    #[test]
    fn test_no_extra_trimming() {
        assert_eq!(extract_bearer(&headers_with("Bearer  padded")).unwrap(), " padded");
        assert_eq!(extract_bearer(&headers_with("Bearer ")).unwrap(), "");
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(extract_api_key(&headers_with("ApiKey abc123")).unwrap(), "abc123");
        assert_eq!(
            extract_api_key(&headers_with("Bearer abc123")),
            Err(CredentialError::MissingOrMalformed { scheme: "ApiKey" })
        );
    }
}
