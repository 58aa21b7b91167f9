//! Session-level transcript state: merged lines plus derived sentences.

use std::sync::{Arc, Mutex};

use crate::models::MergeParams;
use crate::sentence::SentenceSegmenter;
use crate::store::LineStore;

/// Shared handle for the single-writer capture loop plus readers.
///
/// One mutex guards both the line store and the sentence cache, so a
/// reader always observes a consistent snapshot and `clear` serializes
/// against in-flight merges.
pub type SharedTranscript = Arc<Mutex<Transcript>>;

/// One capture session's transcript.
///
/// Owns the line store and caches the derived sentence sequence until the
/// store's revision moves. Callers hold the handle explicitly - there is
/// no process-wide instance.
#[derive(Debug, Default)]
pub struct Transcript {
    store: LineStore,
    segmenter: SentenceSegmenter,
    cached_revision: Option<u64>,
    cached_sentences: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(params: MergeParams, segmenter: SentenceSegmenter) -> Self {
        Self {
            store: LineStore::with_params(params),
            segmenter,
            cached_revision: None,
            cached_sentences: Vec::new(),
        }
    }

    pub fn shared() -> SharedTranscript {
        Self::new().into_shared()
    }

    pub fn into_shared(self) -> SharedTranscript {
        Arc::new(Mutex::new(self))
    }

    /// Absorb one OCR reading (see [`LineStore::add_batch`]).
    pub fn add_batch(&mut self, batch: &str) {
        self.store.add_batch(batch);
    }

    /// Merged raw lines, oldest first.
    pub fn lines(&self) -> &[String] {
        self.store.lines()
    }

    /// Complete-sentence view of the current lines, rebuilt only when the
    /// store changed since the last call.
    pub fn sentences(&mut self) -> &[String] {
        let revision = self.store.revision();
        if self.cached_revision != Some(revision) {
            self.cached_sentences = self.segmenter.rebuild_sentences(self.store.lines());
            self.cached_revision = Some(revision);
        }
        &self.cached_sentences
    }

    /// Every reconstructed sentence, in order.
    pub fn all_sentences(&mut self) -> Vec<String> {
        self.sentences().to_vec()
    }

    /// The last `n` sentences in original order; fewer when the sequence
    /// is shorter, empty when there are none (or `n` is zero).
    pub fn last_n(&mut self, n: usize) -> Vec<String> {
        let sentences = self.sentences();
        let start = sentences.len().saturating_sub(n);
        sentences[start..].to_vec()
    }

    /// Drop all session state.
    pub fn clear(&mut self) {
        self.store.clear();
        self.cached_revision = None;
        self.cached_sentences.clear();
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_follow_merges() {
        let mut transcript = Transcript::new();
        transcript.add_batch("Hello world.\nThis is");
        assert_eq!(transcript.sentences(), ["Hello world.", "This is"]);

        transcript.add_batch("This is\nthe full caption. And more.");
        assert_eq!(
            transcript.sentences(),
            ["Hello world.", "This is the full caption.", "And more."]
        );
    }

    #[test]
    fn test_cache_reused_until_store_changes() {
        let mut transcript = Transcript::new();
        transcript.add_batch("One sentence here. Another one.");

        let first = transcript.sentences().to_vec();
        let second = transcript.sentences().to_vec();
        assert_eq!(first, second);

        // A blank batch is a no-op and must not invalidate anything.
        transcript.add_batch("\n\n");
        assert_eq!(transcript.sentences(), first.as_slice());
    }

    #[test]
    fn test_last_n_bounds() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_n(5).is_empty());

        transcript.add_batch("First one. Second one. Third one. Fourth one.");

        assert!(transcript.last_n(0).is_empty());
        assert_eq!(transcript.last_n(2), ["Third one.", "Fourth one."]);
        assert_eq!(transcript.last_n(4).len(), 4);
        assert_eq!(transcript.last_n(100).len(), 4);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut transcript = Transcript::new();
        transcript.add_batch("Some captured text. More text.");
        assert!(!transcript.all_sentences().is_empty());

        transcript.clear();
        assert!(transcript.lines().is_empty());
        assert!(transcript.all_sentences().is_empty());
    }

    #[test]
    fn test_shared_handle_roundtrip() {
        let shared = Transcript::shared();
        {
            let mut guard = shared.lock().unwrap();
            guard.add_batch("Across the lock. It works.");
        }
        let mut guard = shared.lock().unwrap();
        assert_eq!(guard.all_sentences(), ["Across the lock.", "It works."]);
    }
}
