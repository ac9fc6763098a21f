//! Voice note domain types

use serde::{Deserialize, Serialize};

/// A voice note tracked through its processing lifecycle
///
/// Created by an upload, advanced through transcription/summarization by the
/// remote service. All fields besides `id` and `status` are optional because
/// the service elides them until the relevant processing stage has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: String,
    pub status: NoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VoiceNote {
    /// Whether the note has reached a status it cannot leave
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Processing status reported by the service
///
/// `completed` and `failed` are terminal. Anything the service sends that
/// this client does not recognize maps to `Unknown` and is treated as still
/// in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl NoteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, NoteStatus::Completed | NoteStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteStatus::Pending => "pending",
            NoteStatus::Processing => "processing",
            NoteStatus::Completed => "completed",
            NoteStatus::Failed => "failed",
            NoteStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string does not name a known status
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown note status `{0}`, expected pending, processing, completed, or failed")]
pub struct ParseNoteStatusError(pub String);

impl std::str::FromStr for NoteStatus {
    type Err = ParseNoteStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(NoteStatus::Pending),
            "processing" => Ok(NoteStatus::Processing),
            "completed" => Ok(NoteStatus::Completed),
            "failed" => Ok(NoteStatus::Failed),
            other => Err(ParseNoteStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(NoteStatus::Completed.is_terminal());
        assert!(NoteStatus::Failed.is_terminal());
        assert!(!NoteStatus::Pending.is_terminal());
        assert!(!NoteStatus::Processing.is_terminal());
        assert!(!NoteStatus::Unknown.is_terminal());
    }

    #[test]
    fn unrecognized_status_deserializes_to_unknown() {
        let status: NoteStatus = serde_json::from_str("\"transcribing\"").unwrap();
        assert_eq!(status, NoteStatus::Unknown);
    }

    #[test]
    fn status_round_trips_from_str() {
        assert_eq!("failed".parse::<NoteStatus>().unwrap(), NoteStatus::Failed);
        assert!("transcribing".parse::<NoteStatus>().is_err());
    }
}
