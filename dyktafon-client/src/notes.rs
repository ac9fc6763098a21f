//! Voice note API endpoints

use async_trait::async_trait;
use reqwest::multipart;

use crate::error::Result;
use crate::poll::{StatusSource, TransportError};
use crate::{ClientError, VoiceNotesClient};
use dyktafon_core::domain::note::VoiceNote;
use dyktafon_core::dto::note::{
    ExportFormat, ListQuery, NoteEnvelope, NoteListPage, ProcessRequest, ReprocessAck,
    ReprocessRequest, UploadOptions,
};

/// Content types the service accepts, keyed by file extension
///
/// Unknown extensions are uploaded without an explicit content type and left
/// for the service to sniff.
fn audio_mime(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension.to_ascii_lowercase().as_str() {
        "m4a" => Some("audio/m4a"),
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}

impl VoiceNotesClient {
    // =============================================================================
    // Note Lifecycle
    // =============================================================================

    /// Upload an audio file as a new voice note
    ///
    /// The note is created in `pending` status; call [`process_note`] to
    /// start transcription.
    ///
    /// [`process_note`]: VoiceNotesClient::process_note
    pub async fn upload_note(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> Result<VoiceNote> {
        let url = format!("{}/api/voice-notes", self.base_url());

        let mut file_part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        if let Some(mime) = audio_mime(file_name) {
            file_part = file_part
                .mime_str(mime)
                .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        }

        let mut form = multipart::Form::new().part("file", file_part);
        if let Some(session) = self.session_id() {
            form = form.text("sessionId", session.to_string());
        }
        if let Some(title) = options.title {
            form = form.text("title", title);
        }
        if let Some(language) = options.language {
            form = form.text("language", language);
        }
        if !options.tags.is_empty() {
            form = form.text("tags", options.tags.join(","));
        }

        let request = self.with_session_header(self.client.post(&url)).multipart(form);
        let response = request.send().await?;

        let envelope: NoteEnvelope = self.handle_response(response).await?;
        Ok(envelope.into_note())
    }

    /// Trigger transcription and summarization for an uploaded note
    pub async fn process_note(&self, note_id: &str, language: Option<&str>) -> Result<VoiceNote> {
        let url = format!("{}/api/voice-notes/{}/process", self.base_url(), note_id);
        let body = ProcessRequest {
            language: language.map(str::to_string),
        };

        let request = self.with_session_header(self.client.post(&url)).json(&body);
        let response = request.send().await?;

        let envelope: NoteEnvelope = self.handle_response(response).await?;
        Ok(envelope.into_note())
    }

    /// Re-run processing with overridden prompts, model, or language
    pub async fn reprocess_note(
        &self,
        note_id: &str,
        request: ReprocessRequest,
    ) -> Result<ReprocessAck> {
        let url = format!("{}/api/voice-notes/{}/reprocess", self.base_url(), note_id);

        let request = self.with_session_header(self.client.post(&url)).json(&request);
        let response = request.send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Retrieval
    // =============================================================================

    /// Fetch a single note
    ///
    /// Transcription and summary text are elided by default; pass the flags
    /// to include them once processing has completed.
    pub async fn get_note(
        &self,
        note_id: &str,
        include_transcription: bool,
        include_summary: bool,
    ) -> Result<VoiceNote> {
        let url = format!("{}/api/voice-notes/{}", self.base_url(), note_id);

        let mut query: Vec<(&str, &str)> = Vec::new();
        if include_transcription {
            query.push(("includeTranscription", "true"));
        }
        if include_summary {
            query.push(("includeSummary", "true"));
        }

        let request = self.with_session_header(self.client.get(&url)).query(&query);
        let response = request.send().await?;

        let envelope: NoteEnvelope = self.handle_response(response).await?;
        Ok(envelope.into_note())
    }

    /// List notes owned by the current session
    pub async fn list_notes(&self, query: &ListQuery) -> Result<NoteListPage> {
        let url = format!("{}/api/voice-notes", self.base_url());

        let page = query.page.to_string();
        let limit = query.limit.to_string();
        let tags = query.tags.join(",");

        let mut params: Vec<(&str, &str)> = vec![("page", page.as_str()), ("limit", limit.as_str())];
        if let Some(status) = query.status {
            params.push(("status", status.as_str()));
        }
        if let Some(search) = &query.search {
            params.push(("search", search.as_str()));
        }
        if !query.tags.is_empty() {
            params.push(("tags", tags.as_str()));
        }

        let request = self.with_session_header(self.client.get(&url)).query(&params);
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Export a note as a rendered document
    ///
    /// Returns the document body; the service sets the filename via a
    /// content-disposition header, which callers are free to ignore.
    pub async fn export_note(&self, note_id: &str, format: ExportFormat) -> Result<String> {
        let url = format!("{}/api/voice-notes/{}/export", self.base_url(), note_id);

        let request = self
            .with_session_header(self.client.get(&url))
            .query(&[("format", format.as_str())]);
        let response = request.send().await?;

        self.handle_text_response(response).await
    }

    /// Delete a note and its audio file
    pub async fn delete_note(&self, note_id: &str) -> Result<()> {
        let url = format!("{}/api/voice-notes/{}", self.base_url(), note_id);

        let request = self.with_session_header(self.client.delete(&url));
        let response = request.send().await?;

        self.handle_empty_response(response).await
    }
}

#[async_trait]
impl StatusSource for VoiceNotesClient {
    async fn fetch_status(&self, note_id: &str) -> std::result::Result<VoiceNote, TransportError> {
        self.get_note(note_id, false, false)
            .await
            .map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_mime_maps_known_extensions() {
        assert_eq!(audio_mime("zabka.m4a"), Some("audio/m4a"));
        assert_eq!(audio_mime("take.2.MP3"), Some("audio/mpeg"));
        assert_eq!(audio_mime("notes.txt"), None);
        assert_eq!(audio_mime("no-extension"), None);
    }
}
