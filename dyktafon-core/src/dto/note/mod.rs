//! Voice note DTOs
//!
//! The service's response envelopes have drifted across deployments: single
//! notes arrive both wrapped in a `voiceNote` field and as bare objects, and
//! list pages have used `voiceNotes` as well as `items`. Normalization lives
//! here so everything downstream of deserialization sees one shape.

use serde::{Deserialize, Serialize};

use crate::domain::note::{NoteStatus, VoiceNote};

/// Single-note response in any of the shapes the service has returned
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NoteEnvelope {
    Wrapped {
        #[serde(rename = "voiceNote")]
        voice_note: VoiceNote,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(VoiceNote),
}

impl NoteEnvelope {
    pub fn into_note(self) -> VoiceNote {
        match self {
            NoteEnvelope::Wrapped { voice_note, .. } => voice_note,
            NoteEnvelope::Bare(note) => note,
        }
    }
}

/// One page of a note listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListPage {
    #[serde(alias = "items", default)]
    pub voice_notes: Vec<VoiceNote>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Listing parameters; maps onto the `GET /api/voice-notes` query string
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<NoteStatus>,
    pub search: Option<String>,
    pub tags: Vec<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            status: None,
            search: None,
            tags: Vec::new(),
        }
    }
}

/// Metadata fields accompanying a multipart upload
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub title: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
}

/// Body of `POST /api/voice-notes/{id}/process`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Body of `POST /api/voice-notes/{id}/reprocess`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprocessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Acknowledgement returned by the reprocess endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ReprocessAck {
    pub id: String,
    pub status: NoteStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Rendered export formats the service can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
        }
    }

    /// File extension the service uses in its download filename
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a format string names no known export format
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown export format `{0}`, expected markdown or json")]
pub struct ParseExportFormatError(pub String);

impl std::str::FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(ParseExportFormatError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_envelope_deserializes() {
        let body = r#"{"voiceNote":{"id":"n-1","status":"pending"},"message":"Voice note uploaded successfully"}"#;
        let envelope: NoteEnvelope = serde_json::from_str(body).unwrap();
        let note = envelope.into_note();
        assert_eq!(note.id, "n-1");
        assert_eq!(note.status, NoteStatus::Pending);
    }

    #[test]
    fn bare_envelope_deserializes() {
        let body = r#"{"id":"n-2","status":"completed","summary":"short recap"}"#;
        let envelope: NoteEnvelope = serde_json::from_str(body).unwrap();
        let note = envelope.into_note();
        assert_eq!(note.id, "n-2");
        assert_eq!(note.summary.as_deref(), Some("short recap"));
    }

    #[test]
    fn envelope_ignores_sibling_fields() {
        // the process endpoint repeats transcription/summary next to the note
        let body = r#"{"voiceNote":{"id":"n-3","status":"processing"},"transcription":null,"summary":null,"message":"Voice note processing started"}"#;
        let note: VoiceNote = serde_json::from_str::<NoteEnvelope>(body).unwrap().into_note();
        assert_eq!(note.status, NoteStatus::Processing);
    }

    #[test]
    fn list_page_accepts_both_field_names() {
        let new_shape = r#"{"voiceNotes":[{"id":"a","status":"pending"}],"total":1,"page":1,"limit":20}"#;
        let old_shape = r#"{"items":[{"id":"a","status":"pending"}],"total":1}"#;

        let page: NoteListPage = serde_json::from_str(new_shape).unwrap();
        assert_eq!(page.voice_notes.len(), 1);

        let page: NoteListPage = serde_json::from_str(old_shape).unwrap();
        assert_eq!(page.voice_notes.len(), 1);
        assert_eq!(page.total, Some(1));
    }

    #[test]
    fn process_request_elides_absent_language() {
        let body = serde_json::to_string(&ProcessRequest::default()).unwrap();
        assert_eq!(body, "{}");

        let body = serde_json::to_string(&ProcessRequest {
            language: Some("PL".into()),
        })
        .unwrap();
        assert_eq!(body, r#"{"language":"PL"}"#);
    }

    #[test]
    fn export_format_parses() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
