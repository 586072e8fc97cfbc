//! Section-aware re-chunking of parser segments.
//!
//! The external parser hands us an ordered list of raw segments (narrative
//! text, titles, list items). We regroup them into retrieval chunks:
//! - a title segment starts a new chunk once the current one is big enough,
//! - chunks are capped at `max_characters` with an `overlap`-sized tail
//!   carried into the next chunk on size-driven breaks,
//! - `new_after` closes a chunk early even mid-section,
//! - fragments under `combine_under` merge into a neighbor.

use serde_json::Value;

use crate::chunk::{coerce_metadata, Chunk, Segment};
use crate::config::ChunkingConfig;
use crate::errors::EngineError;

struct ChunkBuilder<'a> {
    cfg: &'a ChunkingConfig,
    finished: Vec<(String, serde_json::Map<String, Value>)>,
    text: String,
    meta: serde_json::Map<String, Value>,
    /// Chars at the head of `text` that are overlap carry, not fresh input.
    carry: usize,
}

impl<'a> ChunkBuilder<'a> {
    fn new(cfg: &'a ChunkingConfig) -> Self {
        Self {
            cfg,
            finished: Vec::new(),
            text: String::new(),
            meta: serde_json::Map::new(),
            carry: 0,
        }
    }

    fn fresh_len(&self) -> usize {
        char_len(&self.text).saturating_sub(self.carry)
    }

    fn push_segment(&mut self, segment: &Segment) {
        let piece = segment.text.trim();
        if piece.is_empty() {
            return;
        }

        if segment.is_title() && self.fresh_len() >= self.cfg.combine_under {
            self.close_at_section();
        }

        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(piece);
        for (key, value) in &segment.metadata {
            self.meta.entry(key.clone()).or_insert_with(|| value.clone());
        }

        // Hard cap: split mid-segment, carrying the overlap tail forward.
        while char_len(&self.text) > self.cfg.max_characters {
            let (head, rest) = split_at_chars(&self.text, self.cfg.max_characters);
            let tail = tail_chars(&head, self.cfg.overlap);
            self.finished.push((head, self.meta.clone()));
            self.carry = char_len(&tail);
            self.text = tail + &rest;
        }

        // Soft boundary: close early so the next section starts fresh-ish.
        if char_len(&self.text) >= self.cfg.new_after {
            self.close_with_overlap();
        }
    }

    /// Close on a title boundary. No overlap across sections.
    fn close_at_section(&mut self) {
        if self.fresh_len() == 0 {
            self.text.clear();
            self.carry = 0;
            self.meta.clear();
            return;
        }
        let text = std::mem::take(&mut self.text);
        let meta = std::mem::take(&mut self.meta);
        self.finished.push((text, meta));
        self.carry = 0;
    }

    /// Close on a size boundary, seeding the next chunk with the tail.
    fn close_with_overlap(&mut self) {
        if self.fresh_len() == 0 {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let meta = std::mem::take(&mut self.meta);
        let tail = tail_chars(&text, self.cfg.overlap);
        self.finished.push((text, meta));
        self.carry = char_len(&tail);
        self.text = tail;
    }

    fn finish(mut self) -> Vec<(String, serde_json::Map<String, Value>)> {
        let fresh = self.fresh_len();
        if fresh > 0 {
            let merges_into_last = fresh < self.cfg.combine_under
                && self
                    .finished
                    .last()
                    .is_some_and(|(last, _)| char_len(last) + fresh + 2 <= self.cfg.max_characters);

            if merges_into_last {
                let fresh_text = skip_chars(&self.text, self.carry).trim_start().to_string();
                let (last_text, last_meta) = self.finished.last_mut().unwrap_or_else(|| {
                    unreachable!("merges_into_last implies a previous chunk")
                });
                last_text.push_str("\n\n");
                last_text.push_str(&fresh_text);
                for (key, value) in self.meta {
                    last_meta.entry(key).or_insert(value);
                }
            } else {
                self.finished.push((self.text, self.meta));
            }
        }
        self.finished
    }
}

/// Regroup raw parser segments into retrieval chunks.
///
/// Fails with [`EngineError::SegmentationInput`] when there is nothing to
/// chunk; callers must leave the current generation untouched in that case.
pub fn chunk_segments(
    segments: &[Segment],
    cfg: &ChunkingConfig,
) -> Result<Vec<Chunk>, EngineError> {
    if segments.is_empty() {
        return Err(EngineError::SegmentationInput(
            "segment list is empty".to_string(),
        ));
    }
    if segments.iter().all(|s| s.text.trim().is_empty()) {
        return Err(EngineError::SegmentationInput(
            "all segments are blank".to_string(),
        ));
    }

    let mut builder = ChunkBuilder::new(cfg);
    for segment in segments {
        builder.push_segment(segment);
    }

    let chunks = builder
        .finish()
        .into_iter()
        .enumerate()
        .map(|(id, (text, meta))| Chunk {
            id,
            text,
            metadata: coerce_metadata(&meta),
        })
        .collect::<Vec<_>>();

    tracing::info!(chunk_count = chunks.len(), "chunked segments");
    Ok(chunks)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split after `n` chars, at a char boundary.
fn split_at_chars(s: &str, n: usize) -> (String, String) {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => (s[..byte_idx].to_string(), s[byte_idx..].to_string()),
        None => (s.to_string(), String::new()),
    }
}

/// Last `n` chars of `s`.
fn tail_chars(s: &str, n: usize) -> String {
    let len = char_len(s);
    skip_chars(s, len.saturating_sub(n)).to_string()
}

/// The substring after the first `n` chars.
fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => &s[byte_idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg() -> ChunkingConfig {
        ChunkingConfig::default()
    }

    #[test]
    fn empty_segment_list_is_rejected() {
        let err = chunk_segments(&[], &cfg()).unwrap_err();
        assert!(matches!(err, EngineError::SegmentationInput(_)));

        let blanks = vec![Segment::new("   "), Segment::new("\n")];
        let err = chunk_segments(&blanks, &cfg()).unwrap_err();
        assert!(matches!(err, EngineError::SegmentationInput(_)));
    }

    #[test]
    fn tiny_trailing_fragment_merges_into_previous_chunk() {
        let body = "a".repeat(600);
        let segments = vec![
            Segment::new(body.clone()),
            Segment::new("Signed, clerk."), // well under the combine threshold
        ];
        let chunks = chunk_segments(&segments, &cfg()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("Signed, clerk."));
    }

    #[test]
    fn long_unbroken_text_splits_with_overlap() {
        // Three ~1000-char segments, no title boundaries.
        let segments: Vec<Segment> = (0..3)
            .map(|i| {
                Segment::new(
                    std::iter::repeat(char::from(b'a' + i as u8))
                        .take(1000)
                        .collect::<String>(),
                )
            })
            .collect();

        let chunks = chunk_segments(&segments, &cfg()).unwrap();
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 1500);
        }
        // Each chunk starts with the 400-char tail of its predecessor.
        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .text
                .chars()
                .skip(pair[0].text.chars().count() - 400)
                .collect();
            let head: String = pair[1].text.chars().take(400).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn title_segments_start_new_chunks() {
        let segments = vec![
            Segment::new("SECTION ONE").with_meta("category", json!("Title")),
            Segment::new("x".repeat(200)),
            Segment::new("SECTION TWO").with_meta("category", json!("Title")),
            Segment::new("y".repeat(200)),
        ];
        let chunks = chunk_segments(&segments, &cfg()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("SECTION ONE"));
        assert!(chunks[1].text.starts_with("SECTION TWO"));
    }

    #[test]
    fn tiny_section_merges_into_the_next_one() {
        let segments = vec![
            Segment::new("Annex A"), // too small to stand alone
            Segment::new("HEARING NOTES").with_meta("category", json!("Title")),
            Segment::new("z".repeat(300)),
        ];
        let chunks = chunk_segments(&segments, &cfg()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.starts_with("Annex A"));
    }

    #[test]
    fn chunk_metadata_comes_from_contributing_segments() {
        let segments = vec![
            Segment::new("Policy issued on 2019-03-01.")
                .with_meta("page_number", json!(2))
                .with_meta("source", json!("claim.pdf")),
            Segment::new("Premium paid annually."),
        ];
        let chunks = chunk_segments(&segments, &cfg()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source(), Some("claim.pdf"));
    }
}
