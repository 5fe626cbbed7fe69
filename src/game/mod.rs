//! Progressive-reveal word game
//!
//! A secret word is shown fully masked, one letter is uncovered per tick, and
//! the first player to type the word wins. The engine races the reveal ticker
//! against a guess listener and resolves exactly one outcome.

pub mod types;
pub mod word;
pub mod reveal;
pub mod schedule;
pub mod resolution;
pub mod engine;

pub use types::*;
pub use word::Word;
pub use reveal::RevealState;
pub use schedule::Schedule;
pub use resolution::ResolutionCell;
pub use engine::RevealGameEngine;
