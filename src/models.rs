//! Parameter structs and serializable snapshots for the transcript pipeline.

use serde::{Deserialize, Serialize};

/// Merge engine tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MergeParams {
    /// Minimum similarity for a new batch's first line to anchor onto an
    /// existing line. Tolerant on purpose: two OCR readings of the same
    /// on-screen caption line routinely disagree on a few tokens, and a
    /// missed anchor duplicates history. The standalone `similar`
    /// diagnostic uses a stricter 0.8 default instead.
    pub anchor_threshold: f32,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            anchor_threshold: 0.5,
        }
    }
}

/// Serializable snapshot of one session's transcript state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDump {
    pub params: MergeParams,
    pub lines: Vec<String>,
    pub sentences: Vec<String>,
}

/// Counters reported when a live session ends.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SessionStats {
    /// Poll cycles attempted.
    pub polls: u64,
    /// Frames actually captured (window present).
    pub frames: u64,
    /// Batches merged after the change gate let them through.
    pub merges: u64,
}
