#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use deepchat_core::{
    AskRequest, AskResponse, Backend, BackendError, ChatController, ChatMessage, ChatView,
    FileTextResponse, MessageId, Ticker, UploadResponse, UploadedFile, WidgetConfig,
};

pub type TestController = ChatController<MockBackend, RecordingView, YieldTicker>;

/// A file handed to the mock backend for upload.
#[derive(Debug, Clone)]
pub struct TestUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl TestUpload {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }
}

/// Calls the mock backend has seen, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ask { query: String, files: Vec<String> },
    Upload(String),
    Download(String),
    Remove(String),
    Reset,
}

/// Backend with scripted responses. Unscripted calls succeed with a canned
/// answer so tests only script what they care about.
#[derive(Default)]
pub struct MockBackend {
    pub calls: RefCell<Vec<Call>>,
    pub answers: RefCell<VecDeque<Result<AskResponse, BackendError>>>,
    pub uploads: RefCell<VecDeque<Result<UploadResponse, BackendError>>>,
    pub downloads: RefCell<VecDeque<Result<FileTextResponse, BackendError>>>,
    pub removals: RefCell<VecDeque<Result<(), BackendError>>>,
    pub reset_result: RefCell<Option<BackendError>>,
    /// Number of times `ask` yields before answering.
    pub ask_delay: Cell<usize>,
    /// Number of times `upload_file` yields before answering.
    pub upload_delay: Cell<usize>,
    /// Number of times `download_file_text` yields before answering.
    pub download_delay: Cell<usize>,
    /// Number of times `remove_file` yields before answering.
    pub remove_delay: Cell<usize>,
    /// Number of times `reset` yields before answering.
    pub reset_delay: Cell<usize>,
}

async fn pause(times: usize) {
    for _ in 0..times {
        tokio::task::yield_now().await;
    }
}

impl MockBackend {
    pub fn answer(&self, text: &str) {
        self.answers.borrow_mut().push_back(Ok(AskResponse {
            answer: text.to_string(),
        }));
    }

    pub fn fail_ask(&self, error: BackendError) {
        self.answers.borrow_mut().push_back(Err(error));
    }

    pub fn accept_upload(&self, file: UploadedFile) {
        self.uploads.borrow_mut().push_back(Ok(UploadResponse {
            success: true,
            meta: Some(file),
            error: None,
        }));
    }

    pub fn reject_upload(&self, error: &str) {
        self.uploads.borrow_mut().push_back(Ok(UploadResponse {
            success: false,
            meta: None,
            error: Some(error.to_string()),
        }));
    }

    pub fn file_text(&self, text: &str) {
        self.downloads.borrow_mut().push_back(Ok(FileTextResponse {
            success: true,
            text: Some(text.to_string()),
        }));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn ask_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Ask { .. }))
            .count()
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    type Upload = TestUpload;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        self.calls.borrow_mut().push(Call::Ask {
            query: request.query.clone(),
            files: request.files.iter().map(|f| f.filename.clone()).collect(),
        });
        pause(self.ask_delay.get()).await;
        let scripted = self.answers.borrow_mut().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(AskResponse {
                answer: "ok".to_string(),
            })
        })
    }

    async fn upload_file(&self, file: TestUpload) -> Result<UploadResponse, BackendError> {
        self.calls.borrow_mut().push(Call::Upload(file.name.clone()));
        pause(self.upload_delay.get()).await;
        let scripted = self.uploads.borrow_mut().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(UploadResponse {
                success: true,
                meta: Some(UploadedFile {
                    filename: file.name.clone(),
                    server_path: format!("/uploads/{}", file.name),
                    file_type: "application/octet-stream".to_string(),
                }),
                error: None,
            })
        })
    }

    async fn download_file_text(
        &self,
        server_path: &str,
    ) -> Result<FileTextResponse, BackendError> {
        self.calls
            .borrow_mut()
            .push(Call::Download(server_path.to_string()));
        pause(self.download_delay.get()).await;
        let scripted = self.downloads.borrow_mut().pop_front();
        scripted.unwrap_or_else(|| Ok(FileTextResponse::default()))
    }

    async fn remove_file(&self, server_path: &str) -> Result<(), BackendError> {
        self.calls
            .borrow_mut()
            .push(Call::Remove(server_path.to_string()));
        pause(self.remove_delay.get()).await;
        let scripted = self.removals.borrow_mut().pop_front();
        scripted.unwrap_or(Ok(()))
    }

    async fn reset(&self) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(Call::Reset);
        pause(self.reset_delay.get()).await;
        match self.reset_result.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Everything the controller asked the view to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Appended(ChatMessage),
    Updated(ChatMessage),
    Removed(MessageId),
    Cleared,
    Files(Vec<String>),
    Typing(bool),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: RefCell<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    pub fn updates_for(&self, id: u64) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ViewEvent::Updated(m) if m.id == id))
            .count()
    }
}

impl ChatView for RecordingView {
    fn message_appended(&self, message: &ChatMessage) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Appended(message.clone()));
    }

    fn message_updated(&self, message: &ChatMessage) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Updated(message.clone()));
    }

    fn message_removed(&self, id: MessageId) {
        self.events.borrow_mut().push(ViewEvent::Removed(id));
    }

    fn transcript_cleared(&self) {
        self.events.borrow_mut().push(ViewEvent::Cleared);
    }

    fn files_changed(&self, files: &[UploadedFile]) {
        self.events.borrow_mut().push(ViewEvent::Files(
            files.iter().map(|f| f.filename.clone()).collect(),
        ));
    }

    fn typing_changed(&self, visible: bool) {
        self.events.borrow_mut().push(ViewEvent::Typing(visible));
    }
}

/// Ticker that yields to the runtime once per frame instead of sleeping,
/// so concurrent operations interleave deterministically.
#[derive(Default)]
pub struct YieldTicker {
    pub ticks: Cell<usize>,
}

#[async_trait(?Send)]
impl Ticker for YieldTicker {
    async fn tick(&self, _period: Duration) {
        self.ticks.set(self.ticks.get() + 1);
        tokio::task::yield_now().await;
    }
}

pub fn controller() -> TestController {
    let _ = env_logger::builder().is_test(true).try_init();
    ChatController::new(
        MockBackend::default(),
        RecordingView::default(),
        YieldTicker::default(),
        WidgetConfig::default(),
    )
}

pub fn uploaded(name: &str, server_path: &str, file_type: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        server_path: server_path.to_string(),
        file_type: file_type.to_string(),
    }
}
