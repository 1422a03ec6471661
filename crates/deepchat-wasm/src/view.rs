use std::cell::RefCell;
use std::collections::HashMap;

use deepchat_core::files::render_file_list;
use deepchat_core::transcript::render_message;
use deepchat_core::{ChatMessage, ChatView, ElementIds, MessageId, MessageStyle, UploadedFile};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::dom;

/// Renders the controller's state into the host page.
pub struct DomView {
    document: Document,
    chat_box: Element,
    typing: Element,
    file_list: Element,
    nodes: RefCell<HashMap<MessageId, Element>>,
}

impl DomView {
    pub fn new(document: Document, ids: &ElementIds) -> Result<Self, JsValue> {
        let chat_box = dom::get_element_by_id(&document, &ids.chat_box)?;
        let typing = dom::get_element_by_id(&document, &ids.typing)?;
        let file_list = dom::get_element_by_id(&document, &ids.file_list)?;

        Ok(Self {
            document,
            chat_box,
            typing,
            file_list,
            nodes: RefCell::new(HashMap::new()),
        })
    }

    fn create_node(&self, message: &ChatMessage) -> Result<Element, JsValue> {
        let class = match message.style {
            MessageStyle::Lines => message.role.css_class().to_string(),
            MessageStyle::Inline => format!("{} revealed", message.role.css_class()),
        };
        let node = self.document.create_element("div")?;
        node.set_class_name(&class);
        node.set_inner_html(&render_message(message));
        self.chat_box.append_child(&node)?;
        Ok(node)
    }
}

impl ChatView for DomView {
    fn message_appended(&self, message: &ChatMessage) {
        match self.create_node(message) {
            Ok(node) => {
                self.nodes.borrow_mut().insert(message.id, node);
                dom::scroll_to_bottom(&self.chat_box);
            }
            Err(e) => log::error!("Failed to render message {}: {:?}", message.id, e),
        }
    }

    fn message_updated(&self, message: &ChatMessage) {
        if let Some(node) = self.nodes.borrow().get(&message.id) {
            node.set_inner_html(&render_message(message));
            dom::scroll_to_bottom(&self.chat_box);
        }
    }

    fn message_removed(&self, id: MessageId) {
        if let Some(node) = self.nodes.borrow_mut().remove(&id) {
            node.remove();
        }
    }

    fn transcript_cleared(&self) {
        self.nodes.borrow_mut().clear();
        dom::clear_element(&self.chat_box);
    }

    fn files_changed(&self, files: &[UploadedFile]) {
        self.file_list.set_inner_html(&render_file_list(files));
    }

    fn typing_changed(&self, visible: bool) {
        if visible {
            dom::show_element(&self.typing);
        } else {
            dom::hide_element(&self.typing);
        }
    }
}
