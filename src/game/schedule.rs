//! Reveal cadence computed once at game start
//!
//! For `n` letters and reveal fraction `f`:
//!
//! - `reveals_needed = ceil(n * f) + 1`
//! - `time_period = total_duration / reveals_needed`
//! - `max_unrevealed = ceil(n * (1 - f))`
//!
//! The extra tick in `reveals_needed` is the final tick that ends the game
//! at exactly `total_duration`. At most `floor(n * f)` reveals are needed to
//! hit the cap, so every reveal fits in the ticks before it.

use crate::game::types::GameSettings;
use std::time::Duration;

/// Floor for the auto-derived reveal fraction
pub const MIN_REVEAL_FRACTION: f64 = 0.03;

/// Derive a reveal fraction that shrinks for longer words:
/// `max(0.03, 0.75 * 0.8^floor(letters / 5))`
pub fn default_reveal_fraction(letter_count: usize) -> f64 {
    let steps = (letter_count / 5) as i32;
    (0.75 * 0.8_f64.powi(steps)).max(MIN_REVEAL_FRACTION)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub letter_count: usize,
    pub reveal_fraction: f64,
    /// Number of ticks, including the final one
    pub reveals_needed: usize,
    pub time_period: Duration,
    /// Reaching this many hidden letters ends the game by cap
    pub max_unrevealed: usize,
    pub total_duration: Duration,
}

impl Schedule {
    pub fn compute(letter_count: usize, settings: &GameSettings) -> Self {
        let reveal_fraction = settings
            .reveal_fraction
            .unwrap_or_else(|| default_reveal_fraction(letter_count));
        let letters = letter_count as f64;

        let reveals_needed = (letters * reveal_fraction).ceil() as usize + 1;
        let total_duration = Duration::from_secs_f64(settings.total_duration_secs);
        let time_period = total_duration.div_f64(reveals_needed as f64);
        let max_unrevealed = ((letters * (1.0 - reveal_fraction)).ceil() as usize).min(letter_count);

        Self {
            letter_count,
            reveal_fraction,
            reveals_needed,
            time_period,
            max_unrevealed,
            total_duration,
        }
    }

    /// Offset from game start at which tick `k` (1-based) fires.
    ///
    /// The last tick lands exactly on `total_duration`.
    pub fn tick_offset(&self, tick: usize) -> Duration {
        if tick >= self.reveals_needed {
            self.total_duration
        } else {
            self.time_period * tick as u32
        }
    }

    pub fn is_final_tick(&self, tick: usize) -> bool {
        tick >= self.reveals_needed
    }

    /// How many reveals it takes to bring the hidden count down to the cap
    pub fn reveals_to_cap(&self) -> usize {
        self.letter_count - self.max_unrevealed
    }
}
