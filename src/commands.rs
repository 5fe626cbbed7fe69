//! Chat command surface
//!
//! Parses prefix commands (`!ping`, `!skribbl [duration] [fraction]`) and
//! runs them against a transport, replying with user-facing error messages
//! when a command cannot be run.

use crate::common::traits::{ChatTransport, WordSource};
use crate::common::types::{ChannelId, InboundMessage};
use crate::config::SkribblConfig;
use crate::errors::{CommandError, GameError, SkribblError, SkribblResult};
use crate::game::engine::RevealGameEngine;
use crate::game::types::GameReport;
use futures::StreamExt;
use rand::Rng;
use tracing::{error, info, warn};

pub const PONG: &str = "Pong!";
pub const COMMAND_NOT_FOUND: &str = "Command not found. Please check the command name.";
pub const IMAGE_NOT_FOUND: &str = "Image file not found. Please check the image path.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping,
    Skribbl {
        duration_secs: Option<u32>,
        reveal_fraction: Option<f64>,
    },
}

/// Parse a chat message as a command.
///
/// Returns `None` when the message does not start with `prefix`.
pub fn parse_command(prefix: &str, content: &str) -> Option<Result<Command, CommandError>> {
    let body = content.trim().strip_prefix(prefix)?;
    let mut parts = body.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();

    let command = match name.as_str() {
        "ping" => Ok(Command::Ping),
        "skribbl" => parse_skribbl(parts.next(), parts.next()),
        _ => Err(CommandError::NotFound(name)),
    };
    Some(command)
}

fn parse_skribbl(duration: Option<&str>, fraction: Option<&str>) -> Result<Command, CommandError> {
    let duration_secs = duration
        .map(|value| {
            value
                .parse::<u32>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| CommandError::InvalidArgument {
                    name: "duration".to_string(),
                    value: value.to_string(),
                })
        })
        .transpose()?;

    let reveal_fraction = fraction
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|f| *f > 0.0 && *f <= 1.0)
                .ok_or_else(|| CommandError::InvalidArgument {
                    name: "reveal_fraction".to_string(),
                    value: value.to_string(),
                })
        })
        .transpose()?;

    Ok(Command::Skribbl {
        duration_secs,
        reveal_fraction,
    })
}

/// User-facing reply for a failed command
pub fn error_reply(error: &SkribblError) -> String {
    match error {
        SkribblError::Command(CommandError::NotFound(_)) => COMMAND_NOT_FOUND.to_string(),
        SkribblError::Game(GameError::ImageUnavailable { .. }) => IMAGE_NOT_FOUND.to_string(),
        other => format!("An error occurred: {}", other),
    }
}

/// Routes inbound messages to commands
pub struct CommandDispatcher<'a, T: ?Sized, S: ?Sized> {
    config: &'a SkribblConfig,
    engine: RevealGameEngine,
    transport: &'a T,
    words: &'a S,
}

impl<'a, T, S> CommandDispatcher<'a, T, S>
where
    T: ChatTransport + ?Sized,
    S: WordSource + ?Sized,
{
    pub fn new(config: &'a SkribblConfig, transport: &'a T, words: &'a S) -> Self {
        Self {
            config,
            engine: RevealGameEngine::new(config.engine.clone()),
            transport,
            words,
        }
    }

    /// Handle one inbound message.
    ///
    /// Returns the report when the message started a game. Command failures
    /// are answered in the channel and not returned as errors.
    pub async fn dispatch<R>(
        &self,
        message: &InboundMessage,
        rng: &mut R,
    ) -> Option<GameReport>
    where
        R: Rng + Send,
    {
        if message.author.id == self.transport.bot_user() {
            return None;
        }

        let command = parse_command(&self.config.bot.command_prefix, &message.content)?;
        match self.execute(command, message.channel, rng).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, content = %message.content, "Command failed");
                self.reply(message.channel, &error_reply(&e)).await;
                None
            }
        }
    }

    async fn execute<R>(
        &self,
        command: Result<Command, CommandError>,
        channel: ChannelId,
        rng: &mut R,
    ) -> SkribblResult<Option<GameReport>>
    where
        R: Rng + Send,
    {
        match command? {
            Command::Ping => {
                self.reply(channel, PONG).await;
                Ok(None)
            }
            Command::Skribbl {
                duration_secs,
                reveal_fraction,
            } => {
                let settings = self
                    .config
                    .game_settings(duration_secs.map(f64::from), reveal_fraction)?;
                let report = self
                    .engine
                    .start_game(&settings, channel, self.words, self.transport, rng)
                    .await?;
                Ok(Some(report))
            }
        }
    }

    /// Serve commands from `channel` until its inbound stream ends
    pub async fn run<R>(&self, channel: ChannelId, rng: &mut R) -> usize
    where
        R: Rng + Send,
    {
        let mut inbound = self.transport.receive_messages(channel);
        let mut games = 0;

        while let Some(message) = inbound.next().await {
            if let Some(report) = self.dispatch(&message, &mut *rng).await {
                games += 1;
                match serde_json::to_string(&report) {
                    Ok(json) => info!(report = %json, "Game report"),
                    Err(e) => error!(error = %e, "Failed to serialize game report"),
                }
            }
        }

        games
    }

    async fn reply(&self, channel: ChannelId, text: &str) {
        if let Err(e) = self.transport.send(channel, text, None).await {
            warn!(error = %e, "Failed to send reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::User;
    use crate::transport::MemoryTransport;
    use crate::word_source::StaticWordSource;
    use crate::game::types::WordCard;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_parse_ping_and_plain_text() {
        assert!(matches!(parse_command("!", "!ping"), Some(Ok(Command::Ping))));
        assert!(matches!(parse_command("!", "  !PING "), Some(Ok(Command::Ping))));
        assert!(parse_command("!", "hello there").is_none());
    }

    #[test]
    fn test_parse_skribbl_arguments() {
        assert_eq!(
            parse_command("!", "!skribbl").unwrap().unwrap(),
            Command::Skribbl {
                duration_secs: None,
                reveal_fraction: None
            }
        );
        assert_eq!(
            parse_command("!", "!skribbl 45 0.5").unwrap().unwrap(),
            Command::Skribbl {
                duration_secs: Some(45),
                reveal_fraction: Some(0.5)
            }
        );
        assert!(matches!(
            parse_command("!", "!skribbl soon"),
            Some(Err(CommandError::InvalidArgument { .. }))
        ));
        assert!(matches!(
            parse_command("!", "!skribbl 30 2"),
            Some(Err(CommandError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("!", "!dance").unwrap().unwrap_err();
        assert!(matches!(err, CommandError::NotFound(ref name) if name == "dance"));
        assert_eq!(error_reply(&err.into()), COMMAND_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_replies() {
        let config = SkribblConfig {
            words: SkribblConfig::default_words(),
            ..Default::default()
        };
        let transport = MemoryTransport::default();
        let words = StaticWordSource::new(WordCard::new("no/such/image.png", "cat"));
        let dispatcher = CommandDispatcher::new(&config, &transport, &words);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let channel = ChannelId(5);
        let player = User::new(9, "ada");

        let ping = InboundMessage::new(channel, player.clone(), "!ping");
        assert!(dispatcher.dispatch(&ping, &mut rng).await.is_none());

        let unknown = InboundMessage::new(channel, player.clone(), "!dance");
        assert!(dispatcher.dispatch(&unknown, &mut rng).await.is_none());

        let bad = InboundMessage::new(channel, player.clone(), "!skribbl 30 nope");
        assert!(dispatcher.dispatch(&bad, &mut rng).await.is_none());

        let game = InboundMessage::new(channel, player.clone(), "!skribbl");
        assert!(dispatcher.dispatch(&game, &mut rng).await.is_none());

        let own = InboundMessage::new(channel, User::new(0, "bot"), "!ping");
        assert!(dispatcher.dispatch(&own, &mut rng).await.is_none());

        let sent = transport.sent_texts(channel);
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], PONG);
        assert_eq!(sent[1], COMMAND_NOT_FOUND);
        assert!(sent[2].starts_with("An error occurred:"));
        assert_eq!(sent[3], IMAGE_NOT_FOUND);
    }
}
