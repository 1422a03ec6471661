//! Core state and behaviour for the deepchat widget
//!
//! Everything here is independent of the DOM: the message log and its
//! rendering, the uploaded-file store, the reveal animation, the speech
//! state machine and the controller that dispatches questions to the
//! backend. The browser crate supplies implementations of the
//! [`Backend`], [`ChatView`], [`Ticker`] and [`Recognizer`] traits.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod files;
pub mod protocol;
pub mod reveal;
pub mod speech;
pub mod transcript;
pub mod utils;
pub mod view;

pub use backend::Backend;
pub use config::{ElementIds, WidgetConfig};
pub use controller::{ChatController, SendOutcome};
pub use error::{BackendError, ChatError};
pub use files::FileStore;
pub use protocol::{AskRequest, AskResponse, FileTextResponse, RemoveFileRequest, UploadResponse, UploadedFile};
pub use reveal::Ticker;
pub use speech::{MicIndicator, Recognizer, SpeechBridge, SpeechState};
pub use transcript::{ChatMessage, MessageId, MessageStyle, Role, Transcript};
pub use view::ChatView;
