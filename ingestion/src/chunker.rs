//! Splits document text into the units co-occurrence is counted over.

use cograph_core::config::IngestionConfig;
use cograph_core::model::NetworkKind;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Sentences must be longer than this many characters to count.
    pub min_sentence_chars: usize,
    /// Paragraphs must be longer than this many characters to count.
    pub min_paragraph_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_sentence_chars: 10,
            min_paragraph_chars: 50,
        }
    }
}

impl From<&IngestionConfig> for ChunkingConfig {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            min_sentence_chars: config.min_sentence_chars,
            min_paragraph_chars: config.min_paragraph_chars,
        }
    }
}

/// Pieces between runs of `.`, `!` and `?` longer than `min_chars`.
pub fn split_into_sentences(text: &str, min_chars: usize) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > min_chars)
        .collect()
}

/// Blank-line separated blocks longer than `min_chars`. Falls back to the
/// whole text when no block qualifies.
pub fn split_into_paragraphs(text: &str, min_chars: usize) -> Vec<&str> {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| paragraph.chars().count() > min_chars)
        .collect();
    if paragraphs.is_empty() {
        vec![text]
    } else {
        paragraphs
    }
}

pub trait Chunker: Send + Sync {
    fn units<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

pub struct SentenceChunker {
    min_chars: usize,
}

impl SentenceChunker {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl Chunker for SentenceChunker {
    fn units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_into_sentences(text, self.min_chars)
    }
}

pub struct ParagraphChunker {
    min_chars: usize,
}

impl ParagraphChunker {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl Chunker for ParagraphChunker {
    fn units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_into_paragraphs(text, self.min_chars)
    }
}

pub struct PageChunker;

impl Chunker for PageChunker {
    fn units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        vec![text]
    }
}

pub fn chunker_for(kind: NetworkKind, config: &ChunkingConfig) -> Box<dyn Chunker> {
    match kind {
        NetworkKind::Sentence => Box::new(SentenceChunker::new(config.min_sentence_chars)),
        NetworkKind::Paragraph => Box::new(ParagraphChunker::new(config.min_paragraph_chars)),
        NetworkKind::Page => Box::new(PageChunker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_split_on_terminal_runs() {
        let chunker = SentenceChunker::new(10);
        let text = "Charminar is lovely at dusk!!! Try Haleem nearby?? Ok. Irani Chai with Osmania Biscuit.";
        let units = chunker.units(text);
        assert_eq!(
            units,
            vec![
                "Charminar is lovely at dusk",
                "Try Haleem nearby",
                "Irani Chai with Osmania Biscuit"
            ]
        );
    }

    #[test]
    fn test_paragraphs_filter_short_blocks() {
        let chunker = ParagraphChunker::new(20);
        let text = "Short one.\n\nThis paragraph is clearly long enough to count.\n\n  Another reasonably long paragraph here.  ";
        let units = chunker.units(text);
        assert_eq!(units.len(), 2);
        assert_eq!(units[1], "Another reasonably long paragraph here.");
    }

    #[test]
    fn test_paragraph_fallback_to_whole_text() {
        let chunker = ParagraphChunker::new(50);
        let text = "Haleem and Charminar.";
        assert_eq!(chunker.units(text), vec![text]);
    }

    #[test]
    fn test_page_is_one_unit() {
        let chunker = chunker_for(NetworkKind::Page, &ChunkingConfig::default());
        assert_eq!(chunker.units("a. b. c."), vec!["a. b. c."]);
    }
}
