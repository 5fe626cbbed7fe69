//! Word sources: where each round's picture and secret word come from

use crate::common::traits::WordSource;
use crate::config::WordEntry;
use crate::errors::ConfigurationError;
use crate::game::types::WordCard;
use rand::seq::SliceRandom;

/// Always hands out the same card
#[derive(Debug, Clone)]
pub struct StaticWordSource {
    card: WordCard,
}

impl StaticWordSource {
    pub fn new(card: WordCard) -> Self {
        Self { card }
    }

    /// The bundled sample card
    pub fn placeholder() -> Self {
        Self::new(WordCard::new("images/image.png", "example word"))
    }
}

impl WordSource for StaticWordSource {
    fn next_card(&self) -> WordCard {
        self.card.clone()
    }
}

/// Picks a card uniformly at random from a fixed catalog
#[derive(Debug, Clone)]
pub struct CatalogWordSource {
    cards: Vec<WordCard>,
}

impl CatalogWordSource {
    pub fn new(cards: Vec<WordCard>) -> Result<Self, ConfigurationError> {
        if cards.is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "word catalog is empty".to_string(),
            ));
        }
        Ok(Self { cards })
    }

    pub fn from_entries(entries: &[WordEntry]) -> Result<Self, ConfigurationError> {
        Self::new(entries.iter().map(WordCard::from).collect())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl WordSource for CatalogWordSource {
    fn next_card(&self) -> WordCard {
        let mut rng = rand::thread_rng();
        match self.cards.choose(&mut rng) {
            Some(card) => card.clone(),
            // Unreachable: the constructor rejects empty catalogs
            None => StaticWordSource::placeholder().next_card(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_static_source_repeats_card() {
        let source = StaticWordSource::placeholder();
        assert_eq!(source.next_card(), source.next_card());
        assert_eq!(source.next_card().word, "example word");
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert!(CatalogWordSource::new(vec![]).is_err());
    }

    #[test]
    fn test_catalog_picks_from_entries() {
        let entries = vec![
            WordEntry {
                image: PathBuf::from("a.png"),
                word: "apple".to_string(),
            },
            WordEntry {
                image: PathBuf::from("b.png"),
                word: "banana".to_string(),
            },
        ];
        let source = CatalogWordSource::from_entries(&entries).unwrap();
        assert_eq!(source.len(), 2);

        for _ in 0..20 {
            let card = source.next_card();
            assert!(card.word == "apple" || card.word == "banana");
        }
    }
}
