//! Collaborator interfaces
//!
//! The engine never talks to a chat client directly. It receives these
//! capabilities as parameters, which keeps it testable against fakes.

use crate::common::types::{Attachment, ChannelId, InboundMessage, MessageHandle, User, UserId};
use crate::errors::TransportResult;
use crate::game::types::WordCard;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Chat backend capabilities needed to host a game
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a message (with an optional attachment) and return its handle
    async fn send(
        &self,
        channel: ChannelId,
        text: &str,
        attachment: Option<Attachment>,
    ) -> TransportResult<MessageHandle>;

    /// Replace the text of a previously sent message.
    ///
    /// Fails with `TransportError::MessageGone` if the message was deleted.
    async fn edit(&self, handle: &MessageHandle, text: &str) -> TransportResult<()>;

    /// Subscribe to messages arriving in `channel` from now on.
    ///
    /// The stream is lazy and may end; callers re-subscribe to continue.
    fn receive_messages(&self, channel: ChannelId) -> BoxStream<'static, InboundMessage>;

    /// The account the bot posts as
    fn bot_user(&self) -> UserId;

    /// Render a user mention in the backend's syntax
    fn mention(&self, user: &User) -> String {
        format!("<@{}>", user.id)
    }
}

/// Supplies the picture and secret word for the next game
pub trait WordSource: Send + Sync {
    fn next_card(&self) -> WordCard;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    struct SilentTransport;

    #[async_trait]
    impl ChatTransport for SilentTransport {
        async fn send(
            &self,
            channel: ChannelId,
            _text: &str,
            _attachment: Option<Attachment>,
        ) -> TransportResult<MessageHandle> {
            Ok(MessageHandle {
                channel,
                message_id: 1,
            })
        }

        async fn edit(&self, _handle: &MessageHandle, _text: &str) -> TransportResult<()> {
            Ok(())
        }

        fn receive_messages(&self, _channel: ChannelId) -> BoxStream<'static, InboundMessage> {
            Box::pin(stream::empty())
        }

        fn bot_user(&self) -> UserId {
            UserId(0)
        }
    }

    #[tokio::test]
    async fn test_default_mention() {
        let transport = SilentTransport;
        let user = User::new(42, "ada");
        assert_eq!(transport.mention(&user), "<@42>");

        let handle = transport.send(ChannelId(3), "hi", None).await.unwrap();
        assert_eq!(handle.channel, ChannelId(3));
    }
}
