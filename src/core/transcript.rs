//! # Transcript
//!
//! The conversation store for one feature page: an ordered, append-only list
//! of messages. There is no way to edit or remove a record once it is in.
//! A page that navigates away simply drops its transcript.
//!
//! The backend keeps no conversation memory, so every exchange sends the
//! whole history. [`Transcript::with_pending`] builds that payload without
//! touching the log, which means a failed exchange leaves nothing behind.

use serde::Serialize;

use crate::core::message::Message;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a reference to it.
    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Records a completed round trip: the prompt, then the reply.
    pub fn commit_exchange(&mut self, prompt: Message, reply: Message) {
        self.messages.reserve(2);
        self.append(prompt);
        self.append(reply);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Display order: newest message first.
    pub fn newest_first(&self) -> impl ExactSizeIterator<Item = &Message> {
        self.messages.iter().rev()
    }

    /// The history followed by `next`, ready to send. The log itself is untouched.
    pub fn with_pending(&self, next: &Message) -> Vec<Message> {
        let mut payload = Vec::with_capacity(self.messages.len() + 1);
        payload.extend_from_slice(&self.messages);
        payload.push(next.clone());
        payload
    }
}
