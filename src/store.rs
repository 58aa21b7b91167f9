//! Ordered accumulation of raw OCR lines with anchored batch merging.

use crate::models::MergeParams;
use crate::similarity::is_similar;

/// Append-and-patch sequence of raw OCR lines for one capture session.
///
/// Consecutive readings of a scrolling caption region overlap heavily: the
/// first line of a new batch usually re-reads a line already near the tail
/// of the store. That line becomes the anchor. Everything after the anchor
/// is overwritten positionally - the caption engine re-rendered those
/// lines, possibly with corrected wording - and the overflow is appended.
/// History before the anchor is never touched, so the store stays bounded
/// by what was actually on screen plus newly scrolled-in content.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<String>,
    params: MergeParams,
    revision: u64,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: MergeParams) -> Self {
        Self {
            lines: Vec::new(),
            params,
            revision: 0,
        }
    }

    /// Absorb one OCR reading.
    ///
    /// The anchor search scans from the end backward so the *most recent*
    /// plausible continuation wins - an old duplicate line earlier in
    /// history must not capture a fresh batch. A batch whose first line
    /// matches nothing is appended wholesale; a blank batch is a no-op.
    pub fn add_batch(&mut self, batch: &str) {
        let new_lines: Vec<&str> = batch
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        if new_lines.is_empty() {
            return;
        }

        self.revision += 1;

        let first = new_lines[0];
        for i in (0..self.lines.len()).rev() {
            if is_similar(&self.lines[i], first, self.params.anchor_threshold) {
                // Anchor at i: overwrite forward, then append the overflow.
                let mut k = 1;
                let mut j = i + 1;
                while j < self.lines.len() && k < new_lines.len() {
                    self.lines[j] = new_lines[k].to_string();
                    j += 1;
                    k += 1;
                }
                while k < new_lines.len() {
                    self.lines.push(new_lines[k].to_string());
                    k += 1;
                }
                return;
            }
        }

        self.lines.extend(new_lines.iter().map(|line| line.to_string()));
    }

    /// Drop every accumulated line.
    pub fn clear(&mut self) {
        if !self.lines.is_empty() {
            self.revision += 1;
        }
        self.lines.clear();
    }

    /// Current lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bumped on every mutation; derived caches use it to detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_append_on_empty_store() {
        let mut store = LineStore::new();
        store.add_batch("First line.\nSecond line.");
        assert_eq!(store.lines(), ["First line.", "Second line."]);
    }

    #[test]
    fn test_blank_batch_is_noop() {
        let mut store = LineStore::new();
        store.add_batch("First line.");
        let before = store.revision();

        store.add_batch("");
        store.add_batch("\n  \n\t\n");

        assert_eq!(store.revision(), before);
        assert_eq!(store.lines(), ["First line."]);
    }

    #[test]
    fn test_anchor_overwrite_and_append() {
        let mut store = LineStore::new();
        store.add_batch("Hello world.\nThis is OCR.");
        store.add_batch("This is OCR.\nContinuing text.");

        assert_eq!(
            store.lines(),
            ["Hello world.", "This is OCR.", "Continuing text."]
        );
    }

    #[test]
    fn test_anchor_tolerates_ocr_noise() {
        let mut store = LineStore::new();
        store.add_batch("the quick brown fox jumps over\nthe lazy dog sleeps");
        // Re-reading with one token misread still anchors at line 0.
        store.add_batch("the quick brown fox jumped over\nthe lazy dog sleeps soundly");

        assert_eq!(
            store.lines(),
            [
                "the quick brown fox jumps over",
                "the lazy dog sleeps soundly"
            ]
        );
    }

    #[test]
    fn test_backward_scan_prefers_most_recent_anchor() {
        let mut store = LineStore::new();
        store.add_batch("and then she said\nsomething entirely different here\nand then she said");
        store.add_batch("and then she said\nit was finally over");

        // The duplicate at index 2 anchors, not the stale copy at index 0.
        assert_eq!(
            store.lines(),
            [
                "and then she said",
                "something entirely different here",
                "and then she said",
                "it was finally over"
            ]
        );
    }

    #[test]
    fn test_no_anchor_appends_everything() {
        let mut store = LineStore::new();
        store.add_batch("alpha beta gamma delta");
        store.add_batch("completely unrelated caption text\nwith a second line");

        assert_eq!(store.len(), 3);
        assert_eq!(store.lines()[0], "alpha beta gamma delta");
    }

    #[test]
    fn test_idempotent_re_merge() {
        let mut store = LineStore::new();
        store.add_batch("Hello world.\nThis is OCR.");
        let after_first = store.lines().to_vec();

        store.add_batch("Hello world.\nThis is OCR.");
        assert_eq!(store.lines(), after_first.as_slice());
    }

    #[test]
    fn test_overwrite_shorter_batch_keeps_tail() {
        let mut store = LineStore::new();
        store.add_batch(
            "the weather is cold today\nthe traffic is heavy now\nsports scores coming up next",
        );
        // Batch anchors at the first line but carries only one follow-up,
        // so the third line survives untouched.
        store.add_batch("the weather is cold today\nthe traffic is very heavy");

        assert_eq!(
            store.lines(),
            [
                "the weather is cold today",
                "the traffic is very heavy",
                "sports scores coming up next"
            ]
        );
    }

    #[test]
    fn test_clear_resets_store() {
        let mut store = LineStore::new();
        store.add_batch("something captured");
        let before = store.revision();

        store.clear();
        assert!(store.is_empty());
        assert!(store.revision() > before);

        // Clearing an empty store changes nothing.
        let cleared = store.revision();
        store.clear();
        assert_eq!(store.revision(), cleared);
    }

    #[test]
    fn test_custom_threshold() {
        // Threshold 1.0 only anchors on exact cleaned-token equality.
        let mut store = LineStore::with_params(MergeParams {
            anchor_threshold: 1.0,
        });
        store.add_batch("the quick brown fox jumps over the lazy dog");
        store.add_batch("the quick brown fox jumped over the lazy dog\nnext line");

        // 8/9 similarity no longer anchors, so the batch is appended.
        assert_eq!(store.len(), 3);
    }
}
