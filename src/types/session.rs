//! Session and drift types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session id.
    pub session_id: String,
    /// Session status as reported by the server (e.g. `active`, `completed`).
    pub status: String,
    /// Number of turns recorded so far.
    pub turn_count: u32,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last update time, RFC 3339.
    pub updated_at: String,
}

impl SessionInfo {
    /// Parsed creation time, if the server sent a valid RFC 3339 timestamp.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parsed last update time, if the server sent a valid RFC 3339 timestamp.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    /// Returns true while the session accepts new turns.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Response of `POST /v1/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionCreated {
    pub session_id: String,
}

/// A session list in either envelope or bare form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SessionListPayload {
    Envelope { sessions: Vec<SessionInfo> },
    Bare(Vec<SessionInfo>),
}

impl SessionListPayload {
    pub(crate) fn into_sessions(self) -> Vec<SessionInfo> {
        match self {
            SessionListPayload::Envelope { sessions } | SessionListPayload::Bare(sessions) => {
                sessions
            }
        }
    }
}

/// Who produced a turn recorded with `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The AI assistant.
    #[default]
    Assistant,
    /// The end user.
    User,
    /// A system message.
    System,
}

/// Result of a drift check on a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Whether the user's goal has drifted.
    pub detected: bool,
    /// Kind of drift (e.g. `scope_creep`).
    #[serde(default)]
    pub drift_type: Option<String>,
    /// Severity in `[0, 1]`.
    #[serde(default)]
    pub severity: Option<f64>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Goal before the drift.
    #[serde(default)]
    pub previous_goal: Option<String>,
    /// Goal after the drift.
    #[serde(default)]
    pub current_goal: Option<String>,
}
