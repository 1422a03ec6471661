//! Backend client over `fetch`

use async_trait::async_trait;
use deepchat_core::{
    AskRequest, AskResponse, Backend, BackendError, FileTextResponse, RemoveFileRequest,
    UploadResponse, WidgetConfig,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

pub struct HttpBackend {
    config: WidgetConfig,
}

impl HttpBackend {
    pub fn new(config: WidgetConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }
}

fn transport(e: gloo_net::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

fn js_error(e: JsValue) -> BackendError {
    BackendError::Transport(format!("{:?}", e))
}

fn check_status(response: &Response) -> Result<(), BackendError> {
    if response.ok() {
        Ok(())
    } else {
        Err(BackendError::Status {
            status: response.status(),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    check_status(&response)?;
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    type Upload = File;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        log::debug!("POST /ask: {:?}", request.query);
        let response = Request::post(&self.url("/ask"))
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn upload_file(&self, file: File) -> Result<UploadResponse, BackendError> {
        log::debug!("POST /upload_file: {} ({} bytes)", file.name(), file.size());
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", &file, &file.name())
            .map_err(js_error)?;

        // No explicit content type: the browser adds the multipart boundary.
        let response = Request::post(&self.url("/upload_file"))
            .body(form)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn download_file_text(
        &self,
        server_path: &str,
    ) -> Result<FileTextResponse, BackendError> {
        let response = Request::get(&self.url("/download_file_text"))
            .query([("path", server_path)])
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn remove_file(&self, server_path: &str) -> Result<(), BackendError> {
        let response = Request::post(&self.url("/remove_file"))
            .json(&RemoveFileRequest { path: server_path })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check_status(&response)
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let response = Request::post(&self.url("/reset"))
            .send()
            .await
            .map_err(transport)?;
        check_status(&response)
    }
}
