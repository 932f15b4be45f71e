//! Greedy text chunking for speech synthesis.
//!
//! The backend caps input length per request, so source text is split into
//! chunks that respect paragraph and sentence boundaries. The fill rule is
//! greedy and strictly local: a single left-to-right pass, no lookahead.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ChunkSpec;

/// Default maximum characters per synthesis request.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 4096;

/// Blank-line paragraph separator: two or more consecutive newlines act as
/// one break, tolerating horizontal whitespace on the blank lines.
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("paragraph break regex"));

/// Split text into chunks bounded by `max_chunk_chars`.
///
/// Paragraphs that fit are packed together, separated by a blank line.
/// A paragraph over the limit is split into sentences instead. A single
/// sentence over the limit becomes its own oversized chunk; nothing is
/// ever truncated or dropped.
///
/// The accumulator flushes when appending a unit would make it reach or
/// exceed the limit (strict less-than), so regular chunks always come out
/// under `max_chunk_chars`.
pub fn split_text(text: &str, max_chunk_chars: usize) -> Vec<ChunkSpec> {
    let mut acc = Accumulator::new();

    for paragraph in PARAGRAPH_BREAK.split(text) {
        if paragraph.trim().is_empty() {
            continue;
        }

        let paragraph_chars = paragraph.chars().count();
        if paragraph_chars > max_chunk_chars {
            // Too long to pack whole, fall back to sentence boundaries
            for sentence in split_sentences(paragraph) {
                acc.push(sentence, " ", max_chunk_chars);
            }
        } else {
            acc.push(paragraph, "\n\n", max_chunk_chars);
        }
    }

    acc.flush();

    log::debug!(
        "split {} characters into {} chunks (limit {})",
        text.chars().count(),
        acc.chunks.len(),
        max_chunk_chars
    );

    acc.chunks
        .into_iter()
        .enumerate()
        .map(|(i, content)| ChunkSpec::new(i as u32 + 1, content))
        .collect()
}

/// Accumulates units (paragraphs or sentences) into chunks, tracking the
/// character count incrementally so the pass stays O(n).
struct Accumulator {
    buffer: String,
    buffer_chars: usize,
    chunks: Vec<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            buffer_chars: 0,
            chunks: Vec::new(),
        }
    }

    /// Append a unit, flushing first if the buffer would reach the limit.
    fn push(&mut self, unit: &str, separator: &str, max_chunk_chars: usize) {
        let unit_chars = unit.chars().count();
        if self.buffer_chars + unit_chars >= max_chunk_chars {
            self.flush();
        }
        self.buffer.push_str(unit);
        self.buffer.push_str(separator);
        self.buffer_chars += unit_chars + separator.chars().count();
    }

    /// Trim and emit the buffered chunk, if any.
    fn flush(&mut self) {
        let trimmed = self.buffer.trim();
        if !trimmed.is_empty() {
            self.chunks.push(trimmed.to_string());
        }
        self.buffer.clear();
        self.buffer_chars = 0;
    }
}

/// Split a paragraph into sentences on terminal punctuation (`.`, `!`, `?`)
/// followed by whitespace. Punctuation stays attached to the preceding
/// sentence; the whitespace between sentences is consumed.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut gap_start = 0;
    let mut in_gap = false;
    let mut prev_terminal = false;

    for (i, c) in paragraph.char_indices() {
        if in_gap {
            if c.is_whitespace() {
                continue;
            }
            sentences.push(&paragraph[start..gap_start]);
            start = i;
            in_gap = false;
            prev_terminal = matches!(c, '.' | '!' | '?');
            continue;
        }

        if prev_terminal && c.is_whitespace() {
            in_gap = true;
            gap_start = i;
            continue;
        }

        prev_terminal = matches!(c, '.' | '!' | '?');
    }

    if in_gap {
        sentences.push(&paragraph[start..gap_start]);
    } else if start < paragraph.len() {
        sentences.push(&paragraph[start..]);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("Hello world. How are you?", 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence, 1);
        assert_eq!(chunks[0].content, "Hello world. How are you?");
    }

    #[test]
    fn test_empty_input() {
        assert!(split_text("", 4096).is_empty());
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(split_text("   \n\n  \n\n\t ", 4096).is_empty());
    }

    #[test]
    fn test_two_small_paragraphs_pack_into_one_chunk() {
        let first = "a".repeat(100);
        let second = "b".repeat(200);
        let text = format!("{}\n\n{}", first, second);

        let chunks = split_text(&text, 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, format!("{}\n\n{}", first, second));
    }

    #[test]
    fn test_paragraphs_flush_at_limit() {
        // 6 buffered chars (4 + separator) plus 4 more reaches the limit of
        // 10, so the second paragraph starts a fresh chunk.
        let chunks = split_text("aaaa\n\nbbbb", 10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "aaaa");
        assert_eq!(chunks[1].content, "bbbb");
    }

    #[test]
    fn test_input_exactly_at_limit_stays_one_chunk() {
        let text = "a".repeat(64);
        let chunks = split_text(&text, 64);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count(), 64);
    }

    #[test]
    fn test_oversized_unpunctuated_text_is_one_chunk() {
        // No sentence boundaries to split on, so the whole run is pushed as
        // a single oversized chunk rather than truncated.
        let text = "a".repeat(5000);
        let chunks = split_text(&text, 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count(), 5000);
    }

    #[test]
    fn test_long_paragraph_splits_on_sentences() {
        let sentence = format!("{}.", "word ".repeat(8).trim());
        let paragraph = std::iter::repeat(sentence.clone())
            .take(12)
            .collect::<Vec<_>>()
            .join(" ");
        assert!(paragraph.chars().count() > 100);

        let chunks = split_text(&paragraph, 100);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_count() < 100, "chunk too long: {}", chunk.char_count());
            assert!(chunk.content.ends_with('.'));
        }
    }

    #[test]
    fn test_oversized_sentence_within_paragraph() {
        let long = format!("{}.", "x".repeat(120));
        let paragraph = format!("Short one. {} Short two.", long);

        let chunks = split_text(&paragraph, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "Short one.");
        assert_eq!(chunks[1].content, long);
        assert_eq!(chunks[2].content, "Short two.");
    }

    #[test]
    fn test_sequence_numbers_start_at_one_and_increase() {
        let text = (0..20)
            .map(|i| format!("Paragraph number {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_text(&text, 40);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i as u32 + 1);
        }
    }

    #[test]
    fn test_extra_blank_lines_are_one_separator() {
        let chunks = split_text("First.\n\n\n\nSecond.", 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "First.\n\nSecond.");
    }

    #[test]
    fn test_crlf_paragraph_breaks() {
        let chunks = split_text("First.\r\n\r\nSecond.", 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "First.\n\nSecond.");
    }

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        let sentences = split_sentences("One. Two? Three! Four");
        assert_eq!(sentences, vec!["One.", "Two?", "Three!", "Four"]);
    }

    #[test]
    fn test_split_sentences_consecutive_punctuation() {
        let sentences = split_sentences("Really?! Yes.");
        assert_eq!(sentences, vec!["Really?!", "Yes."]);
    }

    #[test]
    fn test_split_sentences_no_boundary() {
        let sentences = split_sentences("no terminal punctuation here");
        assert_eq!(sentences, vec!["no terminal punctuation here"]);
    }

    proptest! {
        /// Non-whitespace content is never reordered, duplicated, or lost.
        #[test]
        fn prop_non_whitespace_preserved(
            text in "[a-zA-Z0-9 .!?\\n]{0,400}",
            max in 8usize..80,
        ) {
            let chunks = split_text(&text, max);
            let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            let rebuilt: String = chunks
                .iter()
                .flat_map(|c| c.content.chars())
                .filter(|c| !c.is_whitespace())
                .collect();
            prop_assert_eq!(original, rebuilt);
        }

        /// Every chunk is within the limit unless it is a single sentence
        /// that cannot be split further.
        #[test]
        fn prop_chunks_bounded_or_single_sentence(
            text in "[a-zA-Z .!?\\n]{0,400}",
            max in 8usize..80,
        ) {
            for chunk in split_text(&text, max) {
                let within = chunk.char_count() <= max;
                let unsplittable = split_sentences(&chunk.content).len() == 1;
                prop_assert!(
                    within || unsplittable,
                    "chunk of {} chars exceeds limit {} and is splittable",
                    chunk.char_count(),
                    max
                );
            }
        }

        /// Chunks are trimmed and never empty.
        #[test]
        fn prop_chunks_trimmed_non_empty(
            text in "[a-z .!?\\n]{0,300}",
            max in 8usize..80,
        ) {
            for chunk in split_text(&text, max) {
                prop_assert!(!chunk.content.is_empty());
                prop_assert_eq!(chunk.content.trim(), chunk.content.as_str());
            }
        }
    }
}
