//! Capscribe: incremental transcript reconstruction from live-caption OCR.
//!
//! A capture loop photographs a small caption overlay on a fixed cadence;
//! each frame is independently OCR'd, so consecutive readings overlap
//! heavily and disagree only in OCR noise. The merge engine anchors every
//! new reading onto the line history it re-reads, the sentence
//! reconstructor turns the merged lines into complete sentences, and the
//! selection layer hands "last N" / "all" subsequences to the clipboard.
//!
//! # Example
//!
//! ```
//! use capscribe::prelude::*;
//!
//! let mut transcript = Transcript::new();
//! transcript.add_batch("Hello world.\nThis is OCR.");
//! transcript.add_batch("This is OCR.\nContinuing text.");
//!
//! assert_eq!(
//!     transcript.lines(),
//!     ["Hello world.", "This is OCR.", "Continuing text."]
//! );
//! assert_eq!(transcript.last_n(2).len(), 2);
//! ```
//!
//! # Live capture
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use std::time::Duration;
//! use capscribe::prelude::*;
//!
//! let source = WindowSource::new("Live Caption");
//! let engine = TesseractOcr::locate(None, "eng").unwrap();
//! let transcript = Transcript::shared();
//!
//! let mut capture = CaptureLoop::new(source, engine, transcript, Duration::from_millis(500));
//! let stop = AtomicBool::new(false);
//! capture.run(&stop);
//! ```

pub mod capture;
pub mod clipboard;
pub mod models;
pub mod ocr;
pub mod output;
pub mod screen;
pub mod sentence;
pub mod similarity;
pub mod store;
pub mod transcript;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::capture::{
        fingerprint, CaptureError, CaptureLoop, FrameSource, OcrEngine, PollOutcome,
    };
    pub use crate::clipboard::{copy_sentences, ClipboardError, ClipboardSink, SystemClipboard};
    pub use crate::models::{MergeParams, SessionStats, TranscriptDump};
    pub use crate::ocr::{OcrError, TesseractOcr};
    pub use crate::output::{
        write_json, write_json_file, write_text, write_text_file, OutputError,
    };
    pub use crate::screen::{list_window_titles, WindowSource};
    pub use crate::sentence::{SentenceSegmenter, DEFAULT_ABBREVIATIONS};
    pub use crate::similarity::{clean_tokens, is_similar, similarity, word_edit_distance};
    pub use crate::store::LineStore;
    pub use crate::transcript::{SharedTranscript, Transcript};
}

// Re-export the types most callers touch at the crate root
pub use models::MergeParams;
pub use sentence::SentenceSegmenter;
pub use store::LineStore;
pub use transcript::{SharedTranscript, Transcript};
