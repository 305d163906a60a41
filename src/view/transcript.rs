use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            sent_at: Utc::now(),
        }
    }
}

/// Append-only message list. Scroll position is counted in messages and
/// follows the newest entry.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    scroll_top: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, text: impl Into<String>, sender: Sender) -> &Message {
        self.messages.push(Message::new(text, sender));
        self.scroll_top = self.scroll_height();
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn scroll_height(&self) -> usize {
        self.messages.len()
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_top == self.scroll_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_user_message_lands_at_the_bottom() {
        let mut transcript = Transcript::new();
        transcript.add_message("Hello", Sender::User);

        assert_eq!(transcript.len(), 1);
        let message = &transcript.messages()[0];
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.text, "Hello");
        assert!(transcript.is_scrolled_to_bottom());
    }

    #[test]
    fn messages_keep_their_order() {
        let mut transcript = Transcript::new();
        transcript.add_message("Hi there!", Sender::Assistant);
        transcript.add_message("Asha", Sender::User);
        transcript.add_message("Nice to meet you", Sender::Assistant);

        let senders: Vec<_> = transcript.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Assistant, Sender::User, Sender::Assistant]);
        assert_eq!(transcript.scroll_top(), 3);
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Sender::Assistant).unwrap(), "assistant");
    }
}
