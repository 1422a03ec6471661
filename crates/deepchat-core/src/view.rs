use crate::protocol::UploadedFile;
use crate::transcript::{ChatMessage, MessageId};

/// Rendering side of the widget. The controller calls these after every
/// state change; implementations must not call back into the controller.
pub trait ChatView {
    fn message_appended(&self, message: &ChatMessage);
    fn message_updated(&self, message: &ChatMessage);
    fn message_removed(&self, id: MessageId);
    fn transcript_cleared(&self);
    fn files_changed(&self, files: &[UploadedFile]);
    fn typing_changed(&self, visible: bool);
}
