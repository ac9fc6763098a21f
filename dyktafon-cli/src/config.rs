//! Configuration module

use dyktafon_client::VoiceNotesClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the voice-note service
    pub base_url: String,
    /// Session identifier sent with every request
    pub session_id: String,
}

impl Config {
    /// Build a client bound to this configuration
    pub fn client(&self) -> VoiceNotesClient {
        VoiceNotesClient::new(&self.base_url).with_session(&self.session_id)
    }
}
