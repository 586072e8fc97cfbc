//! Evidence context assembly.

use crate::chunk::Chunk;

/// Join chunk texts in fused order with a blank-line separator.
///
/// No truncation happens here; the order is preserved so a length-limited
/// caller can safely take a prefix.
pub fn assemble<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> String {
    chunks
        .into_iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
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
    fn joins_in_given_order_with_blank_lines() {
        let chunks = vec![chunk(2, "second"), chunk(0, "first")];
        let context = assemble(&chunks);
        assert_eq!(context, "second\n\nfirst");
    }

    #[test]
    fn empty_input_assembles_to_empty_string() {
        let none: Vec<Chunk> = Vec::new();
        assert_eq!(assemble(&none), "");
    }
}
