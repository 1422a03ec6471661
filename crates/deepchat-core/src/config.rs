use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

fn default_reveal_interval_ms() -> u32 {
    14
}

fn default_preview_chars() -> usize {
    4000
}

fn default_speech_lang() -> String {
    "en-US".to_string()
}

/// Widget settings, read from the optional JSON blob handed to the
/// browser entry point. Every field has a default so `{}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Prefix for backend endpoints; empty means same origin.
    pub base_url: String,
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u32,
    /// Characters of file text shown by "View text" before truncating.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_speech_lang")]
    pub speech_lang: String,
    pub interim_results: bool,
    pub elements: ElementIds,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            reveal_interval_ms: default_reveal_interval_ms(),
            preview_chars: default_preview_chars(),
            speech_lang: default_speech_lang(),
            interim_results: false,
            elements: ElementIds::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(json: &str) -> Result<Self, ChatError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.reveal_interval_ms))
    }

    /// Build the URL for a backend path such as `/ask`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Ids of the host page elements the widget binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub chat_box: String,
    pub typing: String,
    pub mic_button: String,
    pub mic_status: String,
    pub file_list: String,
    pub file_input: String,
    pub user_input: String,
    pub send_button: String,
    pub upload_button: String,
    pub reset_button: String,
    pub export_button: String,
    pub theme_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            chat_box: "chat-box".to_string(),
            typing: "typing".to_string(),
            mic_button: "mic-btn".to_string(),
            mic_status: "mic-status".to_string(),
            file_list: "file-list".to_string(),
            file_input: "file-input".to_string(),
            user_input: "user-input".to_string(),
            send_button: "send-btn".to_string(),
            upload_button: "upload-btn".to_string(),
            reset_button: "reset-btn".to_string(),
            export_button: "export-btn".to_string(),
            theme_button: "theme-btn".to_string(),
        }
    }
}
