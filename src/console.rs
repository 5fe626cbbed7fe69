//! Terminal chat transport
//!
//! Bot messages are printed to stdout; every line typed on stdin arrives as
//! an inbound message from the console player.

use crate::common::traits::ChatTransport;
use crate::common::types::{Attachment, ChannelId, InboundMessage, MessageHandle, User, UserId};
use crate::errors::{TransportError, TransportResult};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};

/// The single channel a console session plays in
pub const CONSOLE_CHANNEL: ChannelId = ChannelId(1);

const BOT_ID: u64 = 0;
const INBOUND_CAPACITY: usize = 64;

pub struct ConsoleTransport {
    bot_name: String,
    player: User,
    next_id: AtomicU64,
    sent: Mutex<HashSet<u64>>,
    inbound: Mutex<Option<broadcast::Sender<InboundMessage>>>,
}

impl ConsoleTransport {
    pub fn new(bot_name: impl Into<String>, player: User) -> Self {
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        Self {
            bot_name: bot_name.into(),
            player,
            next_id: AtomicU64::new(1),
            sent: Mutex::new(HashSet::new()),
            inbound: Mutex::new(Some(inbound)),
        }
    }

    /// Forward stdin lines as inbound messages until EOF.
    ///
    /// On EOF the inbound side is closed, which ends every subscriber's stream.
    pub fn spawn_stdin_reader(self: &Arc<Self>) -> JoinHandle<()> {
        let transport = Arc::clone(self);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let message =
                            InboundMessage::new(CONSOLE_CHANNEL, transport.player.clone(), line);
                        transport.deliver(message);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        debug!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
            info!("Console input closed");
            transport.close_input();
        })
    }

    /// Push a message to all current subscribers
    pub fn deliver(&self, message: InboundMessage) {
        let sender = self.inbound.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            let _ = sender.send(message);
        }
    }

    pub fn close_input(&self) {
        self.inbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn print(&self, line: &str) -> TransportResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send(
        &self,
        channel: ChannelId,
        text: &str,
        attachment: Option<Attachment>,
    ) -> TransportResult<MessageHandle> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message_id);

        self.print(&format!("[{} #{}] {}", self.bot_name, message_id, text))?;
        if let Some(attachment) = attachment {
            self.print(&format!(
                "    (attached {}, {} bytes)",
                attachment.filename,
                attachment.size()
            ))?;
        }

        Ok(MessageHandle {
            channel,
            message_id,
        })
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> TransportResult<()> {
        let known = self
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&handle.message_id);
        if !known {
            return Err(TransportError::MessageGone(handle.message_id));
        }

        self.print(&format!("[{} #{} edited] {}", self.bot_name, handle.message_id, text))
    }

    fn receive_messages(&self, channel: ChannelId) -> BoxStream<'static, InboundMessage> {
        let sender = self.inbound.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => BroadcastStream::new(sender.subscribe())
                .filter_map(move |item| async move {
                    item.ok().filter(|message| message.channel == channel)
                })
                .boxed(),
            None => stream::empty().boxed(),
        }
    }

    fn bot_user(&self) -> UserId {
        UserId(BOT_ID)
    }

    fn mention(&self, user: &User) -> String {
        format!("@{}", user.name)
    }
}
