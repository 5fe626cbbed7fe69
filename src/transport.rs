//! In-memory chat transport
//!
//! Records everything the bot sends and lets callers inject inbound messages.
//! Used by the test suite and anywhere a game needs to run without a real
//! chat backend.

use crate::common::traits::ChatTransport;
use crate::common::types::{Attachment, ChannelId, InboundMessage, MessageHandle, User, UserId};
use crate::errors::{TransportError, TransportResult};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

const INBOUND_CAPACITY: usize = 256;

/// Something the bot did through the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Sent {
        handle: MessageHandle,
        text: String,
        attachment: Option<String>,
    },
    Edited {
        handle: MessageHandle,
        text: String,
    },
}

impl TransportEvent {
    pub fn text(&self) -> &str {
        match self {
            TransportEvent::Sent { text, .. } | TransportEvent::Edited { text, .. } => text,
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, TransportEvent::Sent { .. })
    }
}

pub struct MemoryTransport {
    bot: UserId,
    next_id: AtomicU64,
    offline: AtomicBool,
    edit_delay_ms: AtomicU64,
    events: Mutex<Vec<TransportEvent>>,
    live: Mutex<HashMap<u64, String>>,
    inbound: broadcast::Sender<InboundMessage>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryTransport {
    pub fn new(bot: UserId) -> Self {
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        Self {
            bot,
            next_id: AtomicU64::new(1),
            offline: AtomicBool::new(false),
            edit_delay_ms: AtomicU64::new(0),
            events: Mutex::new(Vec::new()),
            live: Mutex::new(HashMap::new()),
            inbound,
        }
    }

    /// Deliver an inbound message to current subscribers.
    ///
    /// Returns how many subscribers received it.
    pub fn inject(&self, message: InboundMessage) -> usize {
        self.inbound.send(message).unwrap_or(0)
    }

    /// Shorthand for injecting a message from `author`
    pub fn say(&self, channel: ChannelId, author: &User, content: &str) -> usize {
        self.inject(InboundMessage::new(channel, author.clone(), content))
    }

    /// Delete a sent message so later edits fail with `MessageGone`
    pub fn delete(&self, handle: &MessageHandle) -> bool {
        lock(&self.live).remove(&handle.message_id).is_some()
    }

    /// Make every following send and edit fail
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every following edit take `delay` before it lands
    pub fn set_edit_delay(&self, delay: Duration) {
        self.edit_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        lock(&self.events).clone()
    }

    /// Texts of new messages sent to `channel`, in order
    pub fn sent_texts(&self, channel: ChannelId) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                TransportEvent::Sent { handle, text, .. } if handle.channel == channel => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Texts of every edit, in order
    pub fn edits(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter(|event| !event.is_send())
            .map(|event| event.text().to_string())
            .collect()
    }

    /// Current text of a live message
    pub fn current_text(&self, handle: &MessageHandle) -> Option<String> {
        lock(&self.live).get(&handle.message_id).cloned()
    }

    /// Handle of the first message that carried an attachment
    pub fn first_attachment_message(&self) -> Option<MessageHandle> {
        lock(&self.events).iter().find_map(|event| match event {
            TransportEvent::Sent {
                handle,
                attachment: Some(_),
                ..
            } => Some(*handle),
            _ => None,
        })
    }

    fn ensure_online(&self) -> TransportResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("transport offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(UserId(0))
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    async fn send(
        &self,
        channel: ChannelId,
        text: &str,
        attachment: Option<Attachment>,
    ) -> TransportResult<MessageHandle> {
        self.ensure_online()?;

        let handle = MessageHandle {
            channel,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        lock(&self.live).insert(handle.message_id, text.to_string());
        lock(&self.events).push(TransportEvent::Sent {
            handle,
            text: text.to_string(),
            attachment: attachment.map(|a| a.filename),
        });

        Ok(handle)
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> TransportResult<()> {
        let delay = self.edit_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.ensure_online()?;

        match lock(&self.live).get_mut(&handle.message_id) {
            Some(current) => *current = text.to_string(),
            None => return Err(TransportError::MessageGone(handle.message_id)),
        }
        lock(&self.events).push(TransportEvent::Edited {
            handle: *handle,
            text: text.to_string(),
        });

        Ok(())
    }

    fn receive_messages(&self, channel: ChannelId) -> BoxStream<'static, InboundMessage> {
        BroadcastStream::new(self.inbound.subscribe())
            .filter_map(move |item| async move {
                // Lagged receivers skip ahead
                item.ok().filter(|message| message.channel == channel)
            })
            .boxed()
    }

    fn bot_user(&self) -> UserId {
        self.bot
    }
}
