//! Failure classification for API calls

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// What went wrong with a call, derived from its transport outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 401: the session is no longer valid
    AuthExpired,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 5xx
    ServerError,
    /// No response at all: timeout or connection failure
    NetworkUnavailable,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::AuthExpired,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Only an expired session clears credentials and sends the user to login
    pub fn invalidates_session(self) -> bool {
        self == ErrorKind::AuthExpired
    }

    fn default_message(self) -> &'static str {
        match self {
            ErrorKind::AuthExpired => "Session expired, please log in again",
            ErrorKind::Forbidden => "You do not have permission to access this resource",
            ErrorKind::NotFound => "The requested resource does not exist",
            ErrorKind::ServerError => "Server error",
            ErrorKind::NetworkUnavailable => "Network error, please try again later",
            ErrorKind::Unknown => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AuthExpired => "auth_expired",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ServerError => "server_error",
            ErrorKind::NetworkUnavailable => "network_unavailable",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Rejection delivered to the caller of a failed call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status, absent when no response arrived
    pub status: Option<u16>,
}

/// Classify a failed call from its status (if a response arrived) and decoded body
pub fn classify(status: Option<u16>, payload: Option<&Value>) -> ApiError {
    let Some(status) = status else {
        return ApiError {
            kind: ErrorKind::NetworkUnavailable,
            message: ErrorKind::NetworkUnavailable.default_message().to_string(),
            status: None,
        };
    };

    let kind = ErrorKind::from_status(status);
    let message = match kind {
        ErrorKind::Unknown => {
            payload_message(payload).unwrap_or_else(|| kind.default_message().to_string())
        }
        _ => kind.default_message().to_string(),
    };

    ApiError {
        kind,
        message,
        status: Some(status),
    }
}

/// `message`, or a FastAPI-style string `detail`
fn payload_message(payload: Option<&Value>) -> Option<String> {
    let payload = payload?;
    ["message", "detail"]
        .iter()
        .filter_map(|key| payload.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_kinds() {
        assert_eq!(classify(Some(401), None).kind, ErrorKind::AuthExpired);
        assert_eq!(classify(Some(403), None).kind, ErrorKind::Forbidden);
        assert_eq!(classify(Some(404), None).kind, ErrorKind::NotFound);
        assert_eq!(classify(Some(500), None).kind, ErrorKind::ServerError);
        assert_eq!(classify(Some(503), None).kind, ErrorKind::ServerError);
        assert_eq!(classify(Some(422), None).kind, ErrorKind::Unknown);
        assert_eq!(classify(None, None).kind, ErrorKind::NetworkUnavailable);
    }

    #[test]
    fn test_only_auth_expired_invalidates() {
        assert!(ErrorKind::AuthExpired.invalidates_session());
        for kind in [
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::ServerError,
            ErrorKind::NetworkUnavailable,
            ErrorKind::Unknown,
        ] {
            assert!(!kind.invalidates_session(), "{kind} must not clear the session");
        }
    }

    #[test]
    fn test_unknown_uses_payload_message() {
        let body = json!({"message": "Username already taken"});
        let err = classify(Some(409), Some(&body));
        assert_eq!(err.message, "Username already taken");
        assert_eq!(err.status, Some(409));

        let body = json!({"detail": "Incorrect username or password"});
        assert_eq!(classify(Some(400), Some(&body)).message, "Incorrect username or password");
    }

    #[test]
    fn test_unknown_falls_back_to_generic() {
        let body = json!({"detail": [{"loc": ["body"], "msg": "field required"}]});
        assert_eq!(classify(Some(422), Some(&body)).message, "Unknown error");
        assert_eq!(classify(Some(418), None).message, "Unknown error");
    }

    #[test]
    fn test_known_kinds_ignore_payload() {
        let body = json!({"message": "token signature invalid"});
        let err = classify(Some(401), Some(&body));
        assert_eq!(err.message, "Session expired, please log in again");
    }
}
