use async_trait::async_trait;

use crate::error::BackendError;
use crate::protocol::{AskRequest, AskResponse, FileTextResponse, UploadResponse};

/// The HTTP endpoints the widget consumes.
///
/// Futures are `?Send`: the browser implementation holds `JsValue`s.
#[async_trait(?Send)]
pub trait Backend {
    /// Whatever the surface hands over for upload (a browser `File`, bytes in tests).
    type Upload: 'static;

    /// `POST /ask`
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError>;

    /// `POST /upload_file`
    async fn upload_file(&self, file: Self::Upload) -> Result<UploadResponse, BackendError>;

    /// `GET /download_file_text?path=...`
    async fn download_file_text(&self, server_path: &str)
        -> Result<FileTextResponse, BackendError>;

    /// `POST /remove_file`; Ok means the server acknowledged with a 2xx.
    async fn remove_file(&self, server_path: &str) -> Result<(), BackendError>;

    /// `POST /reset`
    async fn reset(&self) -> Result<(), BackendError>;
}
