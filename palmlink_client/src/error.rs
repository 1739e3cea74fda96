use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// Substring the backend puts in error bodies when a bearer token is
/// missing, malformed, or expired.
pub const INVALID_CREDENTIALS_MARKER: &str = "Could not validate credentials";

/// Body marker on the 404 the contact-list endpoint returns for an account
/// that has never added contact info. Absence of contacts is a valid steady
/// state, so callers convert this case to an empty success.
pub const NO_CONTACTS_MARKER: &str = "No contact information found";

/// Classified failure of one API call. Every error a controller sees is one
/// of these; nothing reaches the UI unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401/403, or any response whose body carries the credential marker.
    /// Fatal to the current screen: the session guard forces re-login.
    #[error("Authentication failed ({status})")]
    Auth { status: u16, message: String },

    /// 422 with a structured `detail` body; the message is surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// Any other non-2xx response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Transport failure: the request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Local misconfiguration (bad base URL, unreadable upload file).
    #[error("{0}")]
    Config(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// Only transport failures are worth retrying; auth, validation, and
    /// server rejections would fail identically on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Classifies a non-2xx response from its status and raw body.
pub fn classify_http_failure(status: u16, body: &str) -> ApiError {
    let message = extract_error_message(body);
    if status == 401 || status == 403 || body.contains(INVALID_CREDENTIALS_MARKER) {
        return ApiError::Auth {
            status,
            message: message.unwrap_or_else(|| INVALID_CREDENTIALS_MARKER.to_string()),
        };
    }
    if status == 422 {
        return ApiError::Validation(message.unwrap_or_else(|| "Invalid input data".to_string()));
    }
    ApiError::Server {
        status,
        message: message.unwrap_or_else(|| format!("HTTP {status}")),
    }
}

pub fn is_no_contacts_body(body: &str) -> bool {
    body.contains(NO_CONTACTS_MARKER)
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct ValidationBody {
    detail: Vec<ValidationItem>,
}

#[derive(Deserialize)]
struct ValidationItem {
    msg: String,
}

/// The backend is inconsistent about error shapes: some endpoints answer
/// `{"message": ...}`, others `{"detail": [{"msg": ...}]}`. Both are tried
/// in order; anything else is logged and falls back to a generic message.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<MessageBody>(trimmed) {
        if !parsed.message.is_empty() {
            return Some(parsed.message);
        }
    }
    if let Ok(parsed) = serde_json::from_str::<ValidationBody>(trimmed) {
        if let Some(first) = parsed.detail.into_iter().next() {
            return Some(first.msg);
        }
    }
    let preview: String = trimmed.chars().take(200).collect();
    warn!("unrecognized error body shape: {preview}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_shape_is_parsed() {
        let err = classify_http_failure(500, r#"{"message":"database down"}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "database down".into()
            }
        );
    }

    #[test]
    fn validation_detail_shape_is_parsed() {
        let err = classify_http_failure(
            422,
            r#"{"detail":[{"loc":["body","email"],"msg":"invalid email format","type":"value_error"}]}"#,
        );
        assert_eq!(err, ApiError::Validation("invalid email format".into()));
    }

    #[test]
    fn unknown_shape_falls_back_to_generic_message() {
        let err = classify_http_failure(500, r#"{"oops":true}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "HTTP 500".into()
            }
        );
    }

    #[test]
    fn auth_statuses_classify_as_auth() {
        assert!(classify_http_failure(401, "").is_auth());
        assert!(classify_http_failure(403, "").is_auth());
        assert!(!classify_http_failure(500, "").is_auth());
    }

    #[test]
    fn credential_marker_classifies_as_auth_regardless_of_status() {
        let err = classify_http_failure(400, r#"{"message":"Could not validate credentials"}"#);
        assert!(err.is_auth());
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(ApiError::Network("timeout".into()).is_retryable());
        assert!(!ApiError::Validation("bad".into()).is_retryable());
        assert!(!classify_http_failure(401, "").is_retryable());
        assert!(!classify_http_failure(500, "").is_retryable());
    }

    #[test]
    fn no_contacts_marker_is_detected() {
        assert!(is_no_contacts_body(
            r#"{"message":"No contact information found for the user."}"#
        ));
        assert!(!is_no_contacts_body(r#"{"message":"not found"}"#));
    }
}
