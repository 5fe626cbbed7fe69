//! The secret word and guess normalization

/// Lowercase and drop everything that is not an ASCII letter or digit.
///
/// Guesses are compared after normalization, so `"Apple-Pear!"` matches the
/// word `"apple pear"`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Immutable secret word, split into revealable (alphabetic) positions and
/// fixed positions that are always shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    chars: Vec<char>,
    normalized: String,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().collect();
        let normalized = normalize(&text);

        Self {
            text,
            chars,
            normalized,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of character positions
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_revealable(&self, index: usize) -> bool {
        self.chars.get(index).is_some_and(|ch| ch.is_alphabetic())
    }

    /// Count of alphabetic positions
    pub fn letter_count(&self) -> usize {
        self.chars.iter().filter(|ch| ch.is_alphabetic()).count()
    }

    /// Letter counts of each whitespace-separated token, e.g. `[5, 4]` for "apple pear"
    pub fn token_letter_counts(&self) -> Vec<usize> {
        self.text
            .split_whitespace()
            .map(|token| token.chars().filter(|ch| ch.is_alphabetic()).count())
            .collect()
    }

    /// Token lengths formatted as `(5, 4)`
    pub fn lengths_label(&self) -> String {
        let counts: Vec<String> = self
            .token_letter_counts()
            .iter()
            .map(usize::to_string)
            .collect();
        format!("({})", counts.join(", "))
    }

    pub fn to_uppercase(&self) -> String {
        self.text.to_uppercase()
    }

    /// True if `guess` equals the word after normalizing both.
    /// A word with nothing left after normalization matches no guess.
    pub fn matches_guess(&self, guess: &str) -> bool {
        !self.normalized.is_empty() && normalize(guess) == self.normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Apple-Pear!"), "applepear");
        assert_eq!(normalize("  R2-D2 "), "r2d2");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn test_guess_matching() {
        let word = Word::new("apple pear");

        assert!(word.matches_guess("Apple-Pear!"));
        assert!(word.matches_guess("applepear "));
        assert!(word.matches_guess("APPLE PEAR"));
        assert!(!word.matches_guess("apple"));
        assert!(!word.matches_guess("apple pears"));
    }

    #[test]
    fn test_letter_counts_skip_punctuation() {
        let word = Word::new("rock 'n' roll");

        assert_eq!(word.letter_count(), 9);
        assert_eq!(word.token_letter_counts(), vec![4, 1, 4]);
        assert_eq!(word.lengths_label(), "(4, 1, 4)");
    }

    #[test]
    fn test_revealable_positions() {
        let word = Word::new("a-b");

        assert!(word.is_revealable(0));
        assert!(!word.is_revealable(1));
        assert!(word.is_revealable(2));
        assert!(!word.is_revealable(3));
    }

    #[test]
    fn test_example_word() {
        let word = Word::new("example word");

        assert_eq!(word.len(), 12);
        assert_eq!(word.letter_count(), 11);
        assert_eq!(word.lengths_label(), "(7, 4)");
        assert_eq!(word.to_uppercase(), "EXAMPLE WORD");
    }
}
