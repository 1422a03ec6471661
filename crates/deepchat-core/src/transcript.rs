//! Ordered message log and its HTML rendering
//!
//! The log is the source of truth for what the chat box shows. Views render
//! each [`ChatMessage`] with [`render_message`] and never read state back
//! from the page.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils::{escape_html, format_time};

pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "user-message",
            Role::Assistant => "bot-message",
        }
    }
}

/// How a message body is turned into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// One `<div>` per line.
    Lines,
    /// The escaped text as-is; used for revealed replies.
    Inline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub style: MessageStyle,
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl Into<String>, role: Role) -> &ChatMessage {
        self.append_styled(text, role, MessageStyle::Lines)
    }

    pub fn append_styled(
        &mut self,
        text: impl Into<String>,
        role: Role,
        style: MessageStyle,
    ) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text: text.into(),
            timestamp: Local::now(),
            style,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Replace the text of a message. Returns `None` when the id is no
    /// longer in the log (e.g. after `clear`).
    pub fn update_text(&mut self, id: MessageId, text: &str) -> Option<&ChatMessage> {
        let message = self.messages.iter_mut().find(|m| m.id == id)?;
        message.text.clear();
        message.text.push_str(text);
        Some(message)
    }

    pub fn remove(&mut self, id: MessageId) -> Option<ChatMessage> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(index))
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message. Ids keep counting so stale ids never match.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Plain-text export, `role: text` per message separated by blank lines.
    pub fn export_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Markup for the message body, without the timestamp.
pub fn render_body(message: &ChatMessage) -> String {
    match message.style {
        MessageStyle::Lines => message
            .text
            .split('\n')
            .map(|line| format!("<div>{}</div>", escape_html(line)))
            .collect(),
        MessageStyle::Inline => escape_html(&message.text),
    }
}

/// Full inner markup of a message node: body plus time suffix.
pub fn render_message(message: &ChatMessage) -> String {
    format!(
        r#"{}<div class="time">{}</div>"#,
        render_body(message),
        format_time(&message.timestamp)
    )
}
