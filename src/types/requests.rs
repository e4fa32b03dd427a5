//! Request bodies sent to the XeroML API.

use serde::Serialize;

use crate::errors::{XeroMlError, XeroMlResult};
use crate::types::session::TurnRole;

/// Body of a parse request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseRequest {
    /// Text to parse.
    pub message: String,
    /// LLM provider the server should use; server default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ParseRequest {
    /// Creates a parse request for a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            provider: None,
        }
    }

    /// Selects the LLM provider.
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Validates the request before sending.
    pub fn validate(&self) -> XeroMlResult<()> {
        if self.message.trim().is_empty() {
            return Err(XeroMlError::validation_param(
                "Message cannot be empty",
                "message",
            ));
        }
        if matches!(&self.provider, Some(p) if p.trim().is_empty()) {
            return Err(XeroMlError::validation_param(
                "Provider cannot be empty when set",
                "provider",
            ));
        }
        Ok(())
    }
}

impl From<&str> for ParseRequest {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ParseRequest {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Body of a session creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of a session update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UpdateRequest<'a> {
    pub response: &'a str,
    pub role: TurnRole,
}

/// Checks that a session id can be placed in a URL path segment.
///
/// Ids are still percent-encoded when spliced into a path.
pub(crate) fn validate_session_id(session_id: &str) -> XeroMlResult<()> {
    if session_id.trim().is_empty() {
        return Err(XeroMlError::validation_param(
            "Session ID cannot be empty",
            "session_id",
        ));
    }
    if matches!(session_id, "." | "..") {
        return Err(XeroMlError::validation_param(
            format!("Session ID '{}' is not a valid path segment", session_id),
            "session_id",
        ));
    }
    if session_id.contains(['/', '?', '#']) {
        return Err(XeroMlError::validation_param(
            format!("Session ID '{}' contains reserved characters", session_id),
            "session_id",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_body() {
        let body = serde_json::to_value(ParseRequest::new("hello")).unwrap();
        assert_eq!(body, json!({"message": "hello"}));

        let body = serde_json::to_value(ParseRequest::new("hello").provider("openai")).unwrap();
        assert_eq!(body, json!({"message": "hello", "provider": "openai"}));
    }

    #[test]
    fn test_parse_request_validation() {
        assert!(ParseRequest::new("hello").validate().is_ok());
        assert!(ParseRequest::new("   ").validate().is_err());
        assert!(ParseRequest::new("hello").provider("").validate().is_err());
    }

    #[test]
    fn test_create_session_body() {
        assert_eq!(
            serde_json::to_value(CreateSessionRequest::default()).unwrap(),
            json!({})
        );
        let request = CreateSessionRequest {
            session_id: Some("my_custom_id".to_string()),
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"session_id": "my_custom_id"})
        );
    }

    #[test]
    fn test_update_body() {
        let request = UpdateRequest {
            response: "done",
            role: TurnRole::Assistant,
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"response": "done", "role": "assistant"})
        );
    }

    #[test]
    fn test_session_id_validation() {
        assert!(validate_session_id("sess_test123").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id("a?b").is_err());
        assert!(validate_session_id(".").is_err());
        assert!(validate_session_id("..").is_err());
        assert!(validate_session_id("...").is_ok());
        assert!(validate_session_id("a\\b").is_ok());
    }
}
