//! Shared type definitions for chat transports
//!
//! These are the transport-neutral values the engine exchanges with whatever
//! chat backend hosts the game.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of a chat channel
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chat user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat user as seen by the game
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }
}

/// Handle to a message the bot has sent, used for later edits
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel: ChannelId,
    pub message_id: u64,
}

/// File attached to an outgoing message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read a file from disk into an attachment named after its basename
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self { filename, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Message received from a chat channel
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: ChannelId,
    pub author: User,
    pub content: String,
}

impl InboundMessage {
    pub fn new(channel: ChannelId, author: User, content: impl Into<String>) -> Self {
        Self {
            channel,
            author,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_attachment_uses_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"\x89PNG")
            .unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.filename, "image.png");
        assert_eq!(attachment.size(), 4);
    }

    #[tokio::test]
    async fn test_attachment_missing_file() {
        let result = Attachment::from_path(Path::new("does/not/exist.png")).await;
        assert!(result.is_err());
    }
}
