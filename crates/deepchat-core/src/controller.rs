//! Message dispatch, file panel operations and reset
//!
//! [`ChatController`] owns the transcript and file list and drives the view.
//! It is single-threaded: state sits in `RefCell`s and no borrow is held
//! across an `.await`.
//!
//! Sends and reveals run as abortable operations. Starting a new one, or a
//! reset, aborts whatever was in flight so two replies never animate at once.
//! File operations are not aborted; they compare the reset epoch they started
//! in and drop their result if the chat was reset meanwhile.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use log::{debug, error, info, warn};

use crate::backend::Backend;
use crate::config::WidgetConfig;
use crate::error::ChatError;
use crate::files::{preview_message, FileStore};
use crate::protocol::{AskRequest, UploadedFile};
use crate::reveal::{self, Ticker};
use crate::transcript::{ChatMessage, MessageId, MessageStyle, Role, Transcript};
use crate::view::ChatView;

pub const RESET_GREETING: &str = "New chat started. Ask anything.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// The reply was fully revealed in this message.
    Answered { reply: MessageId },
    /// A newer send or a reset took over before the reply finished.
    Superseded,
}

#[derive(Default)]
struct ChatState {
    transcript: Transcript,
    files: FileStore,
    typing: bool,
}

struct InFlight {
    generation: u64,
    handle: AbortHandle,
}

pub struct ChatController<B, V, T> {
    backend: B,
    view: V,
    ticker: T,
    config: WidgetConfig,
    state: RefCell<ChatState>,
    in_flight: RefCell<Option<InFlight>>,
    generation: Cell<u64>,
    /// Reply message being revealed by each running operation.
    pending_replies: RefCell<HashMap<u64, MessageId>>,
    /// Bumped by every reset.
    epoch: Cell<u64>,
}

impl<B, V, T> ChatController<B, V, T>
where
    B: Backend,
    V: ChatView,
    T: Ticker,
{
    pub fn new(backend: B, view: V, ticker: T, config: WidgetConfig) -> Self {
        Self {
            backend,
            view,
            ticker,
            config,
            state: RefCell::new(ChatState::default()),
            in_flight: RefCell::new(None),
            generation: Cell::new(0),
            pending_replies: RefCell::new(HashMap::new()),
            epoch: Cell::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().transcript.messages().to_vec()
    }

    pub fn files(&self) -> Vec<UploadedFile> {
        self.state.borrow().files.to_vec()
    }

    pub fn is_typing(&self) -> bool {
        self.state.borrow().typing
    }

    pub fn export_text(&self) -> String {
        self.state.borrow().transcript.export_text()
    }

    /// Append a message rendered line by line.
    pub fn append(&self, text: impl Into<String>, role: Role) -> MessageId {
        self.append_styled(text, role, MessageStyle::Lines)
    }

    /// Append an assistant-role notice produced by the widget itself.
    pub fn notify(&self, text: impl Into<String>) -> MessageId {
        self.append(text, Role::Assistant)
    }

    fn append_styled(&self, text: impl Into<String>, role: Role, style: MessageStyle) -> MessageId {
        let message = self
            .state
            .borrow_mut()
            .transcript
            .append_styled(text, role, style)
            .clone();
        self.view.message_appended(&message);
        message.id
    }

    fn update(&self, id: MessageId, text: &str) -> bool {
        let message = self
            .state
            .borrow_mut()
            .transcript
            .update_text(id, text)
            .cloned();
        match message {
            Some(message) => {
                self.view.message_updated(&message);
                true
            }
            None => false,
        }
    }

    fn discard(&self, id: MessageId) {
        let removed = self.state.borrow_mut().transcript.remove(id);
        if removed.is_some() {
            self.view.message_removed(id);
        }
    }

    /// Whether a reset happened since `epoch` was read.
    fn reset_since(&self, epoch: u64) -> bool {
        self.epoch.get() != epoch
    }

    fn set_typing(&self, visible: bool) {
        self.state.borrow_mut().typing = visible;
        self.view.typing_changed(visible);
    }

    fn files_changed(&self) {
        let files = self.files();
        self.view.files_changed(&files);
    }

    /// Register a new operation, aborting the previous one.
    fn begin_operation(&self) -> (u64, AbortRegistration) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let (handle, registration) = AbortHandle::new_pair();
        let previous = self
            .in_flight
            .borrow_mut()
            .replace(InFlight { generation, handle });
        if let Some(previous) = previous {
            debug!("Operation {} superseded by {}", previous.generation, generation);
            previous.handle.abort();
        }
        (generation, registration)
    }

    /// Clear the in-flight slot, and drop the half-revealed reply of an
    /// aborted operation.
    fn finish_operation(&self, generation: u64, aborted: bool) {
        {
            let mut in_flight = self.in_flight.borrow_mut();
            if in_flight.as_ref().is_some_and(|f| f.generation == generation) {
                *in_flight = None;
            }
        }

        let unfinished = self.pending_replies.borrow_mut().remove(&generation);
        if let Some(id) = unfinished.filter(|_| aborted) {
            debug!("Dropping unfinished reply {}", id);
            self.discard(id);
        }
    }

    /// Abort the in-flight send or reveal, if any.
    pub fn cancel_in_flight(&self) -> bool {
        let previous = self.in_flight.borrow_mut().take();
        match previous {
            Some(previous) => {
                info!("Cancelling operation {}", previous.generation);
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Send a question with the current file list and reveal the answer.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ChatError> {
        let query = text.trim();
        if query.is_empty() {
            debug!("Ignoring empty message");
            return Ok(SendOutcome::Ignored);
        }

        let (generation, registration) = self.begin_operation();
        self.append(query, Role::User);

        let result =
            Abortable::new(self.exchange(generation, query.to_string()), registration).await;
        self.finish_operation(generation, result.is_err());

        match result {
            Ok(Ok(SendOutcome::Answered { reply }))
                if self.state.borrow().transcript.get(reply).is_none() =>
            {
                info!("Reply {} was cleared before send {} returned", reply, generation);
                Ok(SendOutcome::Superseded)
            }
            Ok(outcome) => outcome,
            Err(_) => {
                info!("Send {} superseded", generation);
                Ok(SendOutcome::Superseded)
            }
        }
    }

    async fn exchange(&self, generation: u64, query: String) -> Result<SendOutcome, ChatError> {
        self.set_typing(true);

        let request = AskRequest {
            query,
            files: self.files(),
        };
        debug!("Asking with {} attached file(s)", request.files.len());

        let response = match self.backend.ask(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Ask request failed: {}", e);
                self.set_typing(false);
                self.notify(format!("Something went wrong: {}", e));
                return Err(e.into());
            }
        };

        self.set_typing(false);
        let reply = self.reveal_reply(generation, &response.answer).await;
        Ok(SendOutcome::Answered { reply })
    }

    /// Reveal `text` as a new assistant message. Returns `None` if a newer
    /// operation aborted the animation; the partial message is removed.
    pub async fn reveal(&self, text: &str) -> Option<MessageId> {
        let (generation, registration) = self.begin_operation();
        let result = Abortable::new(self.reveal_reply(generation, text), registration).await;
        self.finish_operation(generation, result.is_err());
        result.ok()
    }

    async fn reveal_reply(&self, generation: u64, text: &str) -> MessageId {
        let id = self.append_styled(String::new(), Role::Assistant, MessageStyle::Inline);
        self.pending_replies.borrow_mut().insert(generation, id);
        let ticks = reveal::play(&self.ticker, self.config.reveal_interval(), text, |frame| {
            self.update(id, frame);
        })
        .await;
        debug!("Revealed message {} in {} ticks", id, ticks);
        id
    }

    /// Upload a file. `Ok(Some(_))` when the backend accepted it,
    /// `Ok(None)` when it reported a failure.
    pub async fn upload(&self, file: B::Upload) -> Result<Option<UploadedFile>, ChatError> {
        let epoch = self.epoch.get();
        let result = self.backend.upload_file(file).await;
        if self.reset_since(epoch) {
            info!("Chat was reset during upload, dropping the result");
            return Err(ChatError::Reset);
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Upload request failed: {}", e);
                self.notify(format!("Upload failed: {}", e));
                return Err(e.into());
            }
        };

        match response.meta {
            Some(meta) if response.success => {
                info!("Uploaded {} as {}", meta.filename, meta.server_path);
                self.state.borrow_mut().files.push(meta.clone());
                self.files_changed();
                self.notify(format!("File uploaded: {}", meta.filename));
                Ok(Some(meta))
            }
            _ => {
                let reason = response.error.unwrap_or_else(|| "unknown error".to_string());
                warn!("Upload rejected: {}", reason);
                self.notify(format!("Upload failed: {}", reason));
                Ok(None)
            }
        }
    }

    /// Show the text of the file at `index` in the transcript.
    pub async fn view_file(&self, index: usize) -> Result<MessageId, ChatError> {
        let file = self
            .state
            .borrow()
            .files
            .get(index)
            .cloned()
            .ok_or(ChatError::NoSuchFile(index))?;

        let epoch = self.epoch.get();
        let result = self.backend.download_file_text(&file.server_path).await;
        if self.reset_since(epoch) {
            info!("Chat was reset while reading {}", file.server_path);
            return Err(ChatError::Reset);
        }

        match result {
            Ok(response) if response.success => {
                let text = response.text.unwrap_or_default();
                Ok(self.notify(preview_message(
                    &file.filename,
                    &text,
                    self.config.preview_chars,
                )))
            }
            Ok(_) => Ok(self.notify("Could not read file text.")),
            Err(e) => {
                error!("Reading {} failed: {}", file.server_path, e);
                self.notify("Could not read file text.");
                Err(e.into())
            }
        }
    }

    /// Delete the file at `index` on the backend, then drop it locally.
    ///
    /// The local entry is only removed once the backend acknowledged the
    /// delete, and it is removed by server path because the index may have
    /// shifted while the request was pending.
    pub async fn remove_file(&self, index: usize) -> Result<UploadedFile, ChatError> {
        let file = self
            .state
            .borrow()
            .files
            .get(index)
            .cloned()
            .ok_or(ChatError::NoSuchFile(index))?;

        let epoch = self.epoch.get();
        let result = self.backend.remove_file(&file.server_path).await;
        if self.reset_since(epoch) {
            info!("Chat was reset while removing {}", file.server_path);
            return Err(ChatError::Reset);
        }

        if let Err(e) = result {
            warn!("Removing {} failed: {}", file.server_path, e);
            self.notify(format!("Could not remove {}: {}", file.filename, e));
            return Err(e.into());
        }

        let removed = self
            .state
            .borrow_mut()
            .files
            .remove_by_path(&file.server_path);
        match removed {
            Some(removed) => {
                self.files_changed();
                self.notify(format!("Removed {}", removed.filename));
                Ok(removed)
            }
            None => {
                debug!("{} was already gone locally", file.server_path);
                Err(ChatError::NoSuchFile(index))
            }
        }
    }

    /// Start over: abort in-flight work, clear local state, tell the backend.
    ///
    /// Local state is cleared before `/reset` is awaited, so anything the
    /// user does while that request is pending survives it.
    pub async fn reset(&self) {
        self.cancel_in_flight();
        self.epoch.set(self.epoch.get() + 1);

        {
            let mut state = self.state.borrow_mut();
            state.transcript.clear();
            state.files.clear();
        }
        self.view.transcript_cleared();
        self.set_typing(false);
        self.files_changed();
        self.notify(RESET_GREETING);

        if let Err(e) = self.backend.reset().await {
            warn!("Backend reset failed, local state was cleared anyway: {}", e);
        }
    }
}
