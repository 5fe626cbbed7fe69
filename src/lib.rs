//! Skribbl - chat word-guessing game
//!
//! A picture and a masked word are posted to a channel; letters are revealed
//! on a timer and the first player to type the word wins. The engine is
//! transport-agnostic: it drives any [`ChatTransport`] and takes its
//! randomness from the caller.

pub mod errors;
pub mod config;
pub mod common;
pub mod game;
pub mod word_source;
pub mod transport;
pub mod console;
pub mod commands;

pub use common::traits::{ChatTransport, WordSource};
pub use common::types::{Attachment, ChannelId, InboundMessage, MessageHandle, User, UserId};
pub use config::{ConfigLoader, EngineConfig, RenderMode, SkribblConfig};
pub use errors::{SkribblError, SkribblResult};
pub use game::{GameReport, GameResult, GameSettings, RevealGameEngine, WordCard};
