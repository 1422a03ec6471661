//! Speech-to-text bridge state machine
//!
//! The browser recognizer reports start/end asynchronously; the bridge only
//! tracks whether we believe it is listening and what the mic controls should
//! show.

use crate::error::ChatError;

pub const UNSUPPORTED_STATUS: &str = "SpeechRecognition not supported in this browser.";

#[cfg_attr(test, mockall::automock)]
pub trait Recognizer {
    fn start(&self) -> Result<(), ChatError>;
    fn stop(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Unsupported,
    Idle,
    Listening,
}

/// What the mic button and status line should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicIndicator {
    pub status: &'static str,
    pub button: &'static str,
    pub enabled: bool,
}

impl MicIndicator {
    pub fn for_state(state: SpeechState) -> Self {
        match state {
            SpeechState::Unsupported => Self {
                status: UNSUPPORTED_STATUS,
                button: "🎙 Start Mic",
                enabled: false,
            },
            SpeechState::Idle => Self {
                status: "Mic off",
                button: "🎙 Start Mic",
                enabled: true,
            },
            SpeechState::Listening => Self {
                status: "Listening...",
                button: "⏸ Stop Mic",
                enabled: true,
            },
        }
    }
}

pub struct SpeechBridge<R> {
    recognizer: Option<R>,
    state: SpeechState,
}

impl<R: Recognizer> SpeechBridge<R> {
    /// `None` means the capability is missing in this browser.
    pub fn new(recognizer: Option<R>) -> Self {
        let state = if recognizer.is_some() {
            SpeechState::Idle
        } else {
            SpeechState::Unsupported
        };
        Self { recognizer, state }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn recognizer(&self) -> Option<&R> {
        self.recognizer.as_ref()
    }

    pub fn is_supported(&self) -> bool {
        self.state != SpeechState::Unsupported
    }

    pub fn indicator(&self) -> MicIndicator {
        MicIndicator::for_state(self.state)
    }

    /// Start listening when idle, stop when listening.
    pub fn toggle(&mut self) -> SpeechState {
        let Some(recognizer) = &self.recognizer else {
            log::warn!("Speech recognition is not available");
            return self.state;
        };

        self.state = match self.state {
            SpeechState::Idle => match recognizer.start() {
                Ok(()) => SpeechState::Listening,
                Err(e) => {
                    log::warn!("Could not start speech recognition: {}", e);
                    SpeechState::Idle
                }
            },
            SpeechState::Listening => {
                recognizer.stop();
                SpeechState::Idle
            }
            SpeechState::Unsupported => SpeechState::Unsupported,
        };
        self.state
    }

    /// The recognizer began capturing audio.
    pub fn on_start(&mut self) -> MicIndicator {
        if self.is_supported() {
            self.state = SpeechState::Listening;
        }
        self.indicator()
    }

    /// The recognizer finished, normally or after an error.
    pub fn on_end(&mut self) -> MicIndicator {
        if self.is_supported() {
            self.state = SpeechState::Idle;
        }
        self.indicator()
    }
}

/// Append a recognized utterance to the input value, space-separated.
pub fn append_transcript(current: &str, heard: &str) -> String {
    if current.is_empty() {
        heard.to_string()
    } else {
        format!("{} {}", current, heard)
    }
}
