use serde::{Deserialize, Serialize};

/// Descriptor of a file the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    /// Opaque handle used for later view/remove calls.
    pub server_path: String,
    /// MIME type or extension label.
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub query: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Response of `POST /upload_file`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub meta: Option<UploadedFile>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /download_file_text`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileTextResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `POST /remove_file`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveFileRequest<'a> {
    pub path: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uploaded_file_uses_type_key() {
        let file = UploadedFile {
            filename: "notes.txt".into(),
            server_path: "/tmp/abc".into(),
            file_type: "text/plain".into(),
        };
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({"filename": "notes.txt", "server_path": "/tmp/abc", "type": "text/plain"})
        );
    }

    #[test]
    fn test_ask_request_shape() {
        let request = AskRequest {
            query: "hello".into(),
            files: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "hello", "files": []})
        );
    }

    #[test]
    fn test_upload_failure_without_meta() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"success": false, "error": "too large"}"#).unwrap();
        assert!(!response.success);
        assert!(response.meta.is_none());
        assert_eq!(response.error.as_deref(), Some("too large"));
    }

    #[test]
    fn test_file_text_defaults() {
        let response: FileTextResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.success);
        assert!(response.text.is_none());
    }
}
