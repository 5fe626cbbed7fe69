//! Per-game reveal mask and masked rendering

use crate::config::RenderMode;
use crate::game::word::Word;
use rand::Rng;

/// Display rendered in place of a non-alphabetic character in blank mode
const BLANK_GAP: &str = "    ";

/// Which positions of the word are currently shown.
///
/// Non-alphabetic positions are shown from creation. Hidden positions only
/// ever shrink: nothing is re-hidden once revealed.
#[derive(Debug, Clone)]
pub struct RevealState {
    revealed: Vec<bool>,
    hidden: Vec<usize>,
}

impl RevealState {
    /// All letters hidden, everything else shown
    pub fn new(word: &Word) -> Self {
        let revealed: Vec<bool> = (0..word.len()).map(|i| !word.is_revealable(i)).collect();
        let hidden = revealed
            .iter()
            .enumerate()
            .filter_map(|(i, shown)| (!shown).then_some(i))
            .collect();

        Self { revealed, hidden }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Reveal one hidden position chosen uniformly at random.
    ///
    /// Returns the revealed index, or `None` when nothing is left to reveal.
    pub fn reveal_random<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        if self.hidden.is_empty() {
            return None;
        }

        let pick = rng.gen_range(0..self.hidden.len());
        let index = self.hidden.remove(pick);
        self.revealed[index] = true;
        Some(index)
    }

    /// Render the masked word
    pub fn render(&self, word: &Word, glyph: &str, mode: RenderMode) -> String {
        let mut out = String::new();
        for (i, ch) in word.chars().iter().enumerate() {
            if !ch.is_alphabetic() {
                match mode {
                    RenderMode::Blank => out.push_str(BLANK_GAP),
                    RenderMode::Verbatim => out.push(*ch),
                }
            } else if self.revealed[i] {
                out.extend(ch.to_uppercase());
            } else {
                out.push_str(glyph);
            }
        }
        out
    }
}

/// Full display line: `Guess the word (5, 4): <masked>`
pub fn display_line(word: &Word, state: &RevealState, glyph: &str, mode: RenderMode) -> String {
    format!(
        "Guess the word {}: {}",
        word.lengths_label(),
        state.render(word, glyph, mode)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_state_hides_only_letters() {
        let word = Word::new("hi there!");
        let state = RevealState::new(&word);

        assert_eq!(state.hidden_count(), 7);
        assert!(state.is_revealed(2));
        assert!(state.is_revealed(8));
        assert!(!state.is_revealed(0));
    }

    #[test]
    fn test_render_modes() {
        let word = Word::new("ab c");
        let state = RevealState::new(&word);

        assert_eq!(state.render(&word, "_", RenderMode::Verbatim), "__ _");
        assert_eq!(state.render(&word, "_", RenderMode::Blank), "__    _");
    }

    #[test]
    fn test_revealed_letters_are_uppercase() {
        let word = Word::new("cat");
        let mut state = RevealState::new(&word);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let index = state.reveal_random(&mut rng).unwrap();
        let rendered = state.render(&word, "#", RenderMode::Blank);

        let expected: String = word
            .chars()
            .iter()
            .enumerate()
            .map(|(i, ch)| if i == index { ch.to_ascii_uppercase() } else { '#' })
            .collect();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_hidden_positions_shrink_monotonically() {
        let word = Word::new("monotonic reveal");
        let mut state = RevealState::new(&word);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut seen = Vec::new();

        while let Some(index) = state.reveal_random(&mut rng) {
            assert!(word.is_revealable(index));
            assert!(!seen.contains(&index));
            seen.push(index);
            assert!(seen.iter().all(|i| state.is_revealed(*i)));
            assert_eq!(state.hidden_count() + seen.len(), word.letter_count());
        }

        assert_eq!(state.hidden_count(), 0);
        assert_eq!(state.reveal_random(&mut rng), None);
    }

    #[test]
    fn test_seeded_reveal_order_is_deterministic() {
        let word = Word::new("deterministic");
        let order = |seed| {
            let mut state = RevealState::new(&word);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            std::iter::from_fn(|| state.reveal_random(&mut rng)).collect::<Vec<_>>()
        };

        assert_eq!(order(7), order(7));
    }

    #[test]
    fn test_display_line() {
        let word = Word::new("apple pear");
        let state = RevealState::new(&word);

        assert_eq!(
            display_line(&word, &state, "⬛ ", RenderMode::Blank),
            "Guess the word (5, 4): ⬛ ⬛ ⬛ ⬛ ⬛     ⬛ ⬛ ⬛ ⬛ "
        );
    }
}
