//! Fixed-window chunker with overlap.
//!
//! Windows are measured in chars and advance by `size - overlap`. Splitting
//! stops once a window reaches the end of the text, so the tail is never
//! re-emitted as a pure-overlap chunk. No sentence or paragraph awareness:
//! boundaries must stay reproducible.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Per-document metadata copied onto every chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMeta {
    pub airline: String,
    pub locale: String,
    pub policy_version: String,
    pub doc_id: String,
    pub source: String,
}

/// A bounded slice of document text, the unit of indexing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub airline: String,
    pub locale: String,
    pub policy_version: String,
    pub doc_id: String,
    /// 1-based, strictly increasing within a document.
    pub chunk_id: u32,
    pub source: String,
}

#[derive(Clone, Copy, Debug)]
pub struct Splitter {
    size: usize,
    overlap: usize,
}

impl Splitter {
    /// # Errors
    /// [`PipelineError::Config`] when `size - overlap <= 0`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, PipelineError> {
        if size == 0 || overlap >= size {
            return Err(PipelineError::Config(format!(
                "chunk size ({size}) must exceed chunk overlap ({overlap})"
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Splits `text` into trimmed, non-empty chunks.
    ///
    /// Blank input yields an empty vector. Windows that trim to nothing are
    /// skipped without consuming an id.
    pub fn split(&self, text: &str, meta: &DocumentMeta) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut out = Vec::with_capacity(len / self.step() + 1);
        let mut start = 0usize;
        let mut chunk_id = 1u32;

        while start < len {
            let end = (start + self.size).min(len);
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                out.push(Chunk {
                    text: trimmed.to_string(),
                    airline: meta.airline.clone(),
                    locale: meta.locale.clone(),
                    policy_version: meta.policy_version.clone(),
                    doc_id: meta.doc_id.clone(),
                    chunk_id,
                    source: meta.source.clone(),
                });
                chunk_id += 1;
            }
            if end == len {
                break;
            }
            start += self.step();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            airline: "Delta".into(),
            locale: "en-US".into(),
            policy_version: "2025-10-01".into(),
            doc_id: "baggage".into(),
            source: "policies/Delta/baggage.md".into(),
        }
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn short_text_is_one_trimmed_chunk() {
        let s = Splitter::new(1000, 120).unwrap();
        let chunks = s.split("  Pets travel in the cabin.\n", &meta());
        assert_eq!(texts(&chunks), vec!["Pets travel in the cabin."]);
        assert_eq!(chunks[0].chunk_id, 1);
        assert_eq!(chunks[0].doc_id, "baggage");
    }

    #[test]
    fn overlap_region_is_duplicated() {
        let digits: String = (0..30).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
        let s = Splitter::new(20, 5).unwrap();
        let chunks = s.split(&digits, &meta());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, &digits[0..20]);
        assert_eq!(chunks[1].text, &digits[15..30]);
    }

    #[test]
    fn letters_scenario() {
        let s = Splitter::new(4, 1).unwrap();
        let chunks = s.split("ABCDEFGHIJ", &meta());
        assert_eq!(texts(&chunks), vec!["ABCD", "DEFG", "GHIJ"]);
        let ids: Vec<u32> = chunks.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn blank_inputs_yield_nothing() {
        let s = Splitter::new(10, 2).unwrap();
        for t in ["", "   ", "\n\t"] {
            assert!(s.split(t, &meta()).is_empty(), "input {t:?}");
        }
    }

    #[test]
    fn ids_stay_contiguous_when_windows_are_blank() {
        let s = Splitter::new(4, 0).unwrap();
        let chunks = s.split("abcd        efgh", &meta());
        assert_eq!(texts(&chunks), vec!["abcd", "efgh"]);
        let ids: Vec<u32> = chunks.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn windows_count_chars_not_bytes() {
        let s = Splitter::new(3, 0).unwrap();
        let chunks = s.split("ñéüàõ", &meta());
        assert_eq!(texts(&chunks), vec!["ñéü", "àõ"]);
    }

    #[test]
    fn non_advancing_step_is_rejected() {
        assert!(matches!(Splitter::new(10, 10), Err(PipelineError::Config(_))));
        assert!(Splitter::new(10, 12).is_err());
        assert!(Splitter::new(0, 0).is_err());
    }

    #[test]
    fn ids_strictly_increase() {
        let s = Splitter::new(50, 10).unwrap();
        let text = "Checked baggage allowance depends on fare class. ".repeat(20);
        let chunks = s.split(&text, &meta());
        assert!(chunks.len() > 1);
        assert!(chunks.windows(2).all(|w| w[1].chunk_id == w[0].chunk_id + 1));
        assert_eq!(chunks[0].chunk_id, 1);
    }
}
