//! Sparse lexical index.
//!
//! Term-frequency ranking over the chunk texts. Embeddings are blind to
//! exact identifiers (policy numbers, dates, amounts); this index catches
//! them. Not incremental: rebuilt whenever the chunk set changes.

use std::collections::{HashMap, HashSet};

use crate::chunk::Chunk;

pub struct KeywordIndex {
    /// Per chunk: term -> frequency normalized by chunk token count.
    term_freqs: Vec<HashMap<String, f32>>,
}

impl KeywordIndex {
    /// Build over the full chunk set. Returns `None` when no chunk yields a
    /// single token; fusion then degrades to the two semantic strategies.
    pub fn build(chunks: &[Chunk]) -> Option<Self> {
        let term_freqs: Vec<HashMap<String, f32>> = chunks
            .iter()
            .map(|chunk| {
                let tokens = tokenize(&chunk.text);
                let total = tokens.len() as f32;
                let mut freqs: HashMap<String, f32> = HashMap::new();
                for token in tokens {
                    *freqs.entry(token).or_insert(0.0) += 1.0;
                }
                for value in freqs.values_mut() {
                    *value /= total;
                }
                freqs
            })
            .collect();

        if term_freqs.iter().all(HashMap::is_empty) {
            return None;
        }
        Some(Self { term_freqs })
    }

    /// Rank chunks by summed term frequency over the distinct query terms.
    /// Chunks with no lexical match are excluded.
    pub fn search(&self, query: &str, k: usize) -> Vec<(usize, f32)> {
        if k == 0 {
            return Vec::new();
        }

        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .term_freqs
            .iter()
            .enumerate()
            .filter_map(|(idx, freqs)| {
                let score: f32 = terms.iter().filter_map(|t| freqs.get(t)).sum();
                (score > 0.0).then_some((idx, score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn chunk(id: usize, text: &str) -> Chunk {
        Chunk {
            id,
            text: text.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn exact_terms_outrank_partial_matches() {
        let chunks = vec![
            chunk(0, "The policy number is POL-12345 issued in March."),
            chunk(1, "Premium payments were made annually."),
            chunk(2, "The policy lapsed after the premium went unpaid."),
        ];
        let index = KeywordIndex::build(&chunks).unwrap();

        let hits = index.search("policy number", 3);
        assert_eq!(hits[0].0, 0);
        assert!(hits.iter().all(|&(id, _)| id != 1));
    }

    #[test]
    fn chunks_without_matches_are_excluded() {
        let chunks = vec![chunk(0, "alpha beta"), chunk(1, "gamma delta")];
        let index = KeywordIndex::build(&chunks).unwrap();

        let hits = index.search("alpha", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn build_returns_none_for_tokenless_corpus() {
        let chunks = vec![chunk(0, "--- ***"), chunk(1, "!!!")];
        assert!(KeywordIndex::build(&chunks).is_none());
    }

    #[test]
    fn empty_corpus_builds_as_unavailable() {
        assert!(KeywordIndex::build(&[]).is_none());
    }
}
