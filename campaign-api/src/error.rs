use campaign_core::CoreError;
use hex_registry::HexError;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server-supplied text, if the error
    /// body was JSON and carried one.
    #[error("{}", describe_status(.status, .status_text, .message))]
    Status {
        status: u16,
        status_text: String,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} must be set")]
    Config(&'static str),

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Map(#[from] HexError),
}

fn describe_status(status: &u16, status_text: &str, message: &Option<String>) -> String {
    match message {
        Some(m) => format!("{status} {status_text}: {m}"),
        None => format!("{status} {status_text}"),
    }
}

impl ApiError {
    /// Builds a status error, pulling a message out of a JSON error body.
    /// Bodies that are not JSON, or carry no message, leave it empty.
    pub fn from_status(status: u16, status_text: &str, body: &str) -> Self {
        ApiError::Status {
            status,
            status_text: status_text.to_string(),
            message: error_message(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Best-effort human-readable text for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Status {
                status,
                status_text,
                ..
            } => format!("{status} {status_text}").trim().to_string(),
            ApiError::Transport(_) => "Could not reach the server. Please try again.".into(),
            ApiError::Decode(_) => "The server sent an unexpected response.".into(),
            other => other.to_string(),
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["Message", "message", "error", "Error", "title", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_message() {
        let err = ApiError::from_status(409, "Conflict", r#"{"Message":"Vote already recorded"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "Vote already recorded");
        assert_eq!(err.to_string(), "409 Conflict: Vote already recorded");
    }

    #[test]
    fn unparsable_body_is_swallowed() {
        let err = ApiError::from_status(502, "Bad Gateway", "<html>upstream down</html>");
        assert!(matches!(err, ApiError::Status { message: None, .. }));
        assert_eq!(err.user_message(), "502 Bad Gateway");
    }

    #[test]
    fn falls_back_through_message_keys() {
        let err = ApiError::from_status(400, "Bad Request", r#"{"title":"Validation failed"}"#);
        assert_eq!(err.user_message(), "Validation failed");
        assert!(ApiError::from_status(404, "Not Found", "").is_not_found());
    }
}
