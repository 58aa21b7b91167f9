//! Change-gated capture/OCR polling loop.
//!
//! The loop is the crate's single writer: it captures a frame, fingerprints
//! it, and only re-runs OCR and the merge when the frame's content actually
//! changed. Capture and OCR sit behind traits so the loop is testable
//! without a screen or an OCR engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use image::RgbaImage;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::ocr::OcrError;
use crate::transcript::SharedTranscript;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("screen capture backend: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces frames of the capture region.
pub trait FrameSource {
    /// One frame, or `None` when the target window is not currently
    /// available. `None` skips the poll cycle; it is not an error.
    fn capture(&mut self) -> Result<Option<RgbaImage>, CaptureError>;
}

/// Turns a frame into raw multi-line text.
pub trait OcrEngine {
    fn recognize(&self, frame: &RgbaImage) -> Result<String, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, frame: &RgbaImage) -> Result<String, OcrError> {
        (**self).recognize(frame)
    }
}

/// Exact content fingerprint of a frame: SHA-256 over the dimensions and
/// the raw pixel bytes. Gating is equality only, never similarity.
pub fn fingerprint(frame: &RgbaImage) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(frame.width().to_le_bytes());
    hasher.update(frame.height().to_le_bytes());
    hasher.update(frame.as_raw());
    hasher.finalize().into()
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Target window unavailable; nothing captured.
    NoFrame,
    /// Frame identical to the previous one; OCR skipped.
    Unchanged,
    /// The OCR pass failed; the transcript was left untouched.
    OcrFailed,
    /// Frame changed and its OCR text was merged into the transcript.
    Merged,
}

/// Fixed-cadence poller owning the write side of a [`SharedTranscript`].
pub struct CaptureLoop<S, E> {
    source: S,
    engine: E,
    transcript: SharedTranscript,
    interval: Duration,
    last_fingerprint: Option<[u8; 32]>,
}

impl<S: FrameSource, E: OcrEngine> CaptureLoop<S, E> {
    pub fn new(source: S, engine: E, transcript: SharedTranscript, interval: Duration) -> Self {
        Self {
            source,
            engine,
            transcript,
            interval,
            last_fingerprint: None,
        }
    }

    /// One capture / gate / OCR / merge cycle.
    ///
    /// OCR runs only when the frame's fingerprint differs from the
    /// previous frame's. The fingerprint is recorded only after a
    /// successful OCR pass, so a failed pass is retried on the next poll
    /// of the same frame, and the batch reaches the store only on success
    /// - a boundary failure cannot corrupt the line history.
    pub fn poll_once(&mut self) -> Result<PollOutcome, CaptureError> {
        let frame = match self.source.capture()? {
            Some(frame) => frame,
            None => return Ok(PollOutcome::NoFrame),
        };

        let print = fingerprint(&frame);
        if self.last_fingerprint == Some(print) {
            return Ok(PollOutcome::Unchanged);
        }

        let text = match self.engine.recognize(&frame) {
            Ok(text) => text,
            Err(err) => {
                warn!("OCR pass failed, skipping poll: {err}");
                return Ok(PollOutcome::OcrFailed);
            }
        };
        self.last_fingerprint = Some(print);

        let mut transcript = self
            .transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        transcript.add_batch(&text);

        Ok(PollOutcome::Merged)
    }

    /// Poll at the fixed cadence until the stop flag is raised, reporting
    /// each cycle's outcome to `on_poll`.
    ///
    /// Capture failures are logged and the loop keeps going. The sleep is
    /// a plain blocking suspension - it is not interruptible mid-interval,
    /// matching the synchronous capture model.
    pub fn run_with<F: FnMut(PollOutcome)>(&mut self, stop: &AtomicBool, mut on_poll: F) {
        while !stop.load(Ordering::SeqCst) {
            match self.poll_once() {
                Ok(outcome) => {
                    debug!("poll outcome: {outcome:?}");
                    on_poll(outcome);
                }
                Err(err) => warn!("capture failed, skipping poll: {err}"),
            }
            thread::sleep(self.interval);
        }
    }

    /// [`run_with`](Self::run_with) without a per-poll callback.
    pub fn run(&mut self, stop: &AtomicBool) {
        self.run_with(stop, |_| {});
    }

    /// Read access to the transcript handle this loop writes into.
    pub fn transcript(&self) -> &SharedTranscript {
        &self.transcript
    }
}
