use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered message history sent to the completion provider.
///
/// At most one `system` message is held, always at index 0. Every write of a
/// `system` message goes through `set_system`, and other messages are never
/// placed in front of it. Not synchronised; a conversation belongs to a single
/// agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at `index`, clamped to the end of the history and kept behind
    /// the system message. A `system` message replaces the current one.
    pub fn insert(&mut self, index: usize, role: Role, content: impl Into<String>) -> &Message {
        if role == Role::System {
            return self.set_system(content);
        }
        let first_free = usize::from(self.system().is_some());
        let index = index.clamp(first_free, self.messages.len());
        self.messages.insert(index, Message::new(role, content));
        &self.messages[index]
    }

    pub fn prepend(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.insert(0, role, content)
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.insert(self.messages.len(), role, content)
    }

    /// Removes the message at `index`, or the last one when `index` is `None`.
    pub fn pop(&mut self, index: Option<usize>) -> Option<Message> {
        match index {
            None => self.messages.pop(),
            Some(i) if i < self.messages.len() => Some(self.messages.remove(i)),
            Some(_) => None,
        }
    }

    pub fn set_system(&mut self, content: impl Into<String>) -> &Message {
        self.messages.retain(|m| m.role != Role::System);
        self.messages.insert(0, Message::system(content));
        &self.messages[0]
    }

    pub fn system(&self) -> Option<&Message> {
        self.messages.first().filter(|m| m.role == Role::System)
    }

    /// Keeps the system message (if any) plus the last `last_n - 1` others.
    pub fn shorten_to(&mut self, last_n: usize) -> &mut Self {
        let keep = last_n.saturating_sub(1);
        let has_system = self.system().is_some();
        let start = usize::from(has_system);
        let history_len = self.messages.len() - start;

        if history_len > keep {
            self.messages.drain(start..start + (history_len - keep));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Replaces the message at `index`, returning the previous one. A `system`
    /// message drops the old entry and becomes the conversation's system
    /// prompt.
    pub fn set(&mut self, index: usize, message: Message) -> Option<Message> {
        if index >= self.messages.len() {
            return None;
        }
        if message.role == Role::System {
            let previous = self.messages.remove(index);
            self.set_system(message.content);
            return Some(previous);
        }
        Some(std::mem::replace(&mut self.messages[index], message))
    }

    /// Copies `range` (clamped to the history) into a new conversation.
    pub fn slice(&self, range: Range<usize>) -> Conversation {
        let end = range.end.min(self.messages.len());
        let start = range.start.min(end);
        Conversation {
            messages: self.messages[start..end].to_vec(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", message.role, message.content)?;
        }
        Ok(())
    }
}
