use crate::protocol::UploadedFile;
use crate::utils::{escape_html, truncate_chars};

const TRUNCATION_MARKER: &str = "\n\n... (truncated)";

/// Uploaded files in insertion order, which is also display order.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    files: Vec<UploadedFile>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn get(&self, index: usize) -> Option<&UploadedFile> {
        self.files.get(index)
    }

    /// Remove the entry with this server path, wherever it sits now.
    pub fn remove_by_path(&mut self, server_path: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|f| f.server_path == server_path)?;
        Some(self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn to_vec(&self) -> Vec<UploadedFile> {
        self.files.clone()
    }
}

/// Markup for the file panel. Buttons carry `data-action` and `data-index`
/// so a single delegated listener can dispatch them.
pub fn render_file_list(files: &[UploadedFile]) -> String {
    files
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                r#"<div class="file-item"><strong>{}</strong> <small>{}</small><div class="file-actions"><button data-action="view" data-index="{i}">View text</button><button data-action="remove" data-index="{i}">Remove</button></div></div>"#,
                escape_html(&f.filename),
                escape_html(&f.file_type),
            )
        })
        .collect()
}

/// Transcript text for "View text", cut to `limit` characters.
pub fn preview_message(filename: &str, text: &str, limit: usize) -> String {
    let (shown, truncated) = truncate_chars(text, limit);
    format!(
        "Contents of {}:\n\n{}{}",
        filename,
        shown,
        if truncated { TRUNCATION_MARKER } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            server_path: format!("/uploads/{}", name),
            file_type: "text/plain".to_string(),
        }
    }

    fn names(store: &FileStore) -> Vec<&str> {
        store.as_slice().iter().map(|f| f.filename.as_str()).collect()
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = FileStore::new();
        for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
            store.push(file(name));
        }
        let removed = store.remove_by_path("/uploads/b.txt").unwrap();
        assert_eq!(removed.filename, "b.txt");
        assert_eq!(names(&store), vec!["a.txt", "c.txt", "d.txt"]);
        assert!(store.remove_by_path("/uploads/missing.txt").is_none());
    }

    #[test]
    fn test_remove_by_path_ignores_position() {
        let mut store = FileStore::new();
        store.push(file("a.txt"));
        store.push(file("b.txt"));
        store.remove_by_path("/uploads/a.txt");
        assert_eq!(store.get(0).map(|f| f.filename.as_str()), Some("b.txt"));
        let removed = store.remove_by_path("/uploads/b.txt").unwrap();
        assert_eq!(removed.filename, "b.txt");
        assert!(store.is_empty());
        assert!(store.remove_by_path("/uploads/b.txt").is_none());
    }

    #[test]
    fn test_render_file_list() {
        let html = render_file_list(&[file("<x>.txt")]);
        assert!(html.contains("<strong>&lt;x&gt;.txt</strong>"));
        assert!(html.contains(r#"data-action="view" data-index="0""#));
        assert!(html.contains(r#"data-action="remove" data-index="0""#));
        assert_eq!(render_file_list(&[]), "");
    }

    #[test]
    fn test_preview_short_text() {
        assert_eq!(
            preview_message("notes.txt", "hello", 4000),
            "Contents of notes.txt:\n\nhello"
        );
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "x".repeat(5000);
        let message = preview_message("big.txt", &text, 4000);
        let expected = format!("Contents of big.txt:\n\n{}\n\n... (truncated)", "x".repeat(4000));
        assert_eq!(message, expected);
    }
}
