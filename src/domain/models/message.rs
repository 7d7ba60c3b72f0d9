#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use super::Author;

/// Only changes how a message is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

/// One transcript entry. Transcripts only grow until a new session clears
/// them.
#[derive(Clone, Debug)]
pub struct Message {
    pub author: Author,
    pub text: String,
    mtype: MessageType,
}

fn normalize(text: &str) -> String {
    return text.replace('\t', "  ");
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message::new_with_type(author, MessageType::Normal, text);
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: normalize(text),
            mtype,
        };
    }

    /// Shorthand for an error notice from the assistant.
    pub fn bot_error(text: &str) -> Message {
        return Message::new_with_type(Author::Bot, MessageType::Error, text);
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }
}
