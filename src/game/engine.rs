//! Progressive-reveal game engine
//!
//! A round runs two activities concurrently:
//!
//! - the **reveal ticker** wakes on a fixed schedule, uncovers one random
//!   letter per tick, edits the game message in place and ends the round
//!   when the reveal cap is hit or the time budget runs out;
//! - the **guess listener** reads the channel's inbound messages and ends
//!   the round when someone types the word.
//!
//! Both resolve through one [`ResolutionCell`]. The ticker holds the cell's
//! lock while it talks to the transport, so once a guess has won no further
//! edits or notices are sent.

use crate::common::traits::{ChatTransport, WordSource};
use crate::common::types::{Attachment, ChannelId, InboundMessage, MessageHandle};
use crate::config::EngineConfig;
use crate::errors::{GameError, SkribblResult, TransportError};
use crate::game::resolution::ResolutionCell;
use crate::game::reveal::{display_line, RevealState};
use crate::game::schedule::Schedule;
use crate::game::types::{GameReport, GameResult, GameSettings};
use crate::game::word::Word;
use futures::stream::{BoxStream, StreamExt};
use rand::Rng;
use tokio::time::{sleep, sleep_until, timeout, Instant};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Sent when the game message disappears mid-round
pub const MESSAGE_GONE_NOTICE: &str = "Message not found or has been deleted.";

/// Runs reveal rounds against an injected transport
#[derive(Debug, Clone, Default)]
pub struct RevealGameEngine {
    config: EngineConfig,
}

/// Everything both activities share for one round
struct Round<'a, T: ?Sized> {
    transport: &'a T,
    channel: ChannelId,
    handle: MessageHandle,
    word: &'a Word,
    schedule: &'a Schedule,
    cell: &'a ResolutionCell,
    started: Instant,
}

impl RevealGameEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Play one round in `channel` and return its report.
    ///
    /// Fails with `GameError::ImageUnavailable` before sending anything if
    /// the card's image cannot be read.
    pub async fn start_game<T, S, R>(
        &self,
        settings: &GameSettings,
        channel: ChannelId,
        words: &S,
        transport: &T,
        rng: &mut R,
    ) -> SkribblResult<GameReport>
    where
        T: ChatTransport + ?Sized,
        S: WordSource + ?Sized,
        R: Rng + Send,
    {
        settings.validate()?;

        let card = words.next_card();
        let attachment = match Attachment::from_path(&card.image).await {
            Ok(attachment) => attachment,
            Err(e) => {
                warn!(image = %card.image.display(), error = %e, "Game image unavailable");
                return Err(GameError::ImageUnavailable {
                    path: card.image,
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let word = Word::new(card.word);
        let schedule = Schedule::compute(word.letter_count(), settings);
        let game_id = Uuid::new_v4().to_string();

        let span = info_span!(
            "game",
            game_id = %game_id,
            channel = %channel,
            letters = schedule.letter_count
        );

        self.play(game_id, channel, word, schedule, attachment, transport, rng)
            .instrument(span)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn play<T, R>(
        &self,
        game_id: String,
        channel: ChannelId,
        word: Word,
        schedule: Schedule,
        attachment: Attachment,
        transport: &T,
        rng: &mut R,
    ) -> SkribblResult<GameReport>
    where
        T: ChatTransport + ?Sized,
        R: Rng + Send,
    {
        let mut state = RevealState::new(&word);
        let glyph = self.config.hidden_glyph.as_str();

        // Subscribe before the game message goes out so no early guess is missed
        let inbound = transport.receive_messages(channel);
        let handle = transport
            .send(
                channel,
                &display_line(&word, &state, glyph, self.config.render_mode),
                Some(attachment),
            )
            .await?;

        info!(
            reveal_fraction = schedule.reveal_fraction,
            ticks = schedule.reveals_needed,
            period_ms = schedule.time_period.as_millis() as u64,
            max_unrevealed = schedule.max_unrevealed,
            "Game started"
        );

        let cell = ResolutionCell::new();
        let round = Round {
            transport,
            channel,
            handle,
            word: &word,
            schedule: &schedule,
            cell: &cell,
            started: Instant::now(),
        };

        if state.hidden_count() <= schedule.max_unrevealed {
            debug!(hidden = state.hidden_count(), "Word starts at the reveal cap");
            cell.try_resolve(GameResult::RevealCapReached).await;
        }

        let (reveals, ()) = tokio::join!(
            self.run_ticker(&round, &mut state, rng),
            self.run_listener(&round, inbound),
        );

        let result = match cell.result().await {
            Some(result) => result,
            None => {
                warn!("Round ended without a resolution, treating as timed out");
                GameResult::TimedOut
            }
        };
        let elapsed = round.started.elapsed();
        info!(result = %result, reveals, elapsed_ms = elapsed.as_millis() as u64, "Game finished");

        self.announce_outcome(&round, &result).await;

        Ok(GameReport {
            game_id,
            word: word.as_str().to_string(),
            result,
            reveals,
            hidden_remaining: state.hidden_count(),
            elapsed,
        })
    }

    /// Reveal letters on schedule until the cap, the deadline or a resolution.
    ///
    /// Returns the number of letters revealed.
    async fn run_ticker<T, R>(&self, round: &Round<'_, T>, state: &mut RevealState, rng: &mut R) -> usize
    where
        T: ChatTransport + ?Sized,
        R: Rng + Send,
    {
        let schedule = round.schedule;
        let deadline = round.started + schedule.total_duration;
        let interval = self.config.announce_interval_secs.max(1);
        let mut last_announced = schedule.total_duration.as_secs();
        let mut reveals = 0;

        for tick in 1.. {
            let offset = schedule.tick_offset(tick);
            tokio::select! {
                _ = round.cell.resolved() => break,
                _ = sleep_until(round.started + offset) => {}
            }

            let Some(guard) = round.cell.lock_unresolved().await else {
                break;
            };

            let time_left = schedule.total_duration.saturating_sub(offset).as_secs();
            if time_left > 0 && time_left / interval < last_announced / interval {
                last_announced = time_left;
                let notice = format!("⏳ Time left: {} seconds.", time_left);
                if let Err(e) = round.transport.send(round.channel, &notice, None).await {
                    warn!(error = %e, "Failed to send time notice");
                }
            }

            // Slow edits can push a tick past the deadline
            if schedule.is_final_tick(tick) || Instant::now() >= deadline {
                debug!(tick, "Time budget exhausted");
                guard.resolve(GameResult::TimedOut);
                break;
            }

            let Some(index) = state.reveal_random(&mut *rng) else {
                guard.resolve(GameResult::RevealCapReached);
                break;
            };
            reveals += 1;
            debug!(tick, index, hidden = state.hidden_count(), "Revealed letter");

            let text = display_line(
                round.word,
                state,
                &self.config.hidden_glyph,
                self.config.render_mode,
            );
            match round.transport.edit(&round.handle, &text).await {
                Ok(()) => {}
                Err(TransportError::MessageGone(id)) => {
                    warn!(message_id = id, "Game message is gone, ending reveals");
                    if let Err(e) = round
                        .transport
                        .send(round.channel, MESSAGE_GONE_NOTICE, None)
                        .await
                    {
                        warn!(error = %e, "Failed to send replacement notice");
                    }
                    guard.resolve(GameResult::RevealCapReached);
                    break;
                }
                Err(e) => warn!(error = %e, "Failed to edit game message"),
            }

            if state.hidden_count() <= schedule.max_unrevealed {
                debug!(tick, hidden = state.hidden_count(), "Reveal cap reached");
                guard.resolve(GameResult::RevealCapReached);
                break;
            }
        }

        reveals
    }

    /// Watch the channel for a correct guess until the round is resolved
    async fn run_listener<T>(&self, round: &Round<'_, T>, mut inbound: BoxStream<'static, InboundMessage>)
    where
        T: ChatTransport + ?Sized,
    {
        let bot = round.transport.bot_user();
        let poll = self.config.poll_interval();

        while !round.cell.is_resolved() {
            let message = match timeout(poll, inbound.next()).await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!("Inbound stream ended, resubscribing");
                    sleep(poll).await;
                    inbound = round.transport.receive_messages(round.channel);
                    continue;
                }
                Err(_) => continue,
            };

            if message.channel != round.channel || message.author.id == bot {
                continue;
            }

            if round.word.matches_guess(&message.content) {
                let user = message.author;
                let name = user.name.clone();
                if round.cell.try_resolve(GameResult::Winner { user }).await {
                    info!(winner = %name, "Word guessed");
                }
                break;
            }
        }
    }

    /// Send the single outcome message; failures are logged and swallowed
    async fn announce_outcome<T>(&self, round: &Round<'_, T>, result: &GameResult)
    where
        T: ChatTransport + ?Sized,
    {
        let word = round.word.to_uppercase();
        let text = match result {
            GameResult::Winner { user } => format!(
                "🎉 {} guessed the word: {}!",
                round.transport.mention(user),
                word
            ),
            GameResult::RevealCapReached => format!("Game over! The word was: {}", word),
            GameResult::TimedOut => format!("⏰ Time's up! The word was: {}", word),
        };

        if let Err(e) = round.transport.send(round.channel, &text, None).await {
            warn!(error = %e, "Failed to send outcome message");
        }
    }
}
