//! Tesseract CLI invocation shim.
//!
//! The core never performs OCR itself; this module adapts the external
//! `tesseract` binary to the [`OcrEngine`](crate::capture::OcrEngine)
//! contract. The frame takes a temp-PNG round trip because tesseract
//! reads files, not pipes of raw pixels.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use image::{ImageFormat, RgbaImage};
use log::debug;
use thiserror::Error;

use crate::capture::OcrEngine;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("tesseract binary not found; install Tesseract OCR or pass an explicit path")]
    EngineNotFound,
    #[error("tesseract exited with {status}: {stderr}")]
    EngineFailed { status: ExitStatus, stderr: String },
    #[error("failed to encode frame: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Well-known install locations probed when the binary is not on PATH.
#[cfg(target_os = "windows")]
const FALLBACK_PATHS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

#[cfg(not(target_os = "windows"))]
const FALLBACK_PATHS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// OCR via the tesseract command-line tool.
pub struct TesseractOcr {
    binary: PathBuf,
    language: String,
    scratch: PathBuf,
}

impl TesseractOcr {
    /// Locate the engine: explicit path first, then `PATH`, then the
    /// well-known install locations.
    pub fn locate(explicit: Option<&Path>, language: &str) -> Result<Self, OcrError> {
        if let Some(path) = explicit {
            return Ok(Self::at(path.to_path_buf(), language));
        }

        if binary_responds("tesseract") {
            return Ok(Self::at(PathBuf::from("tesseract"), language));
        }

        for candidate in FALLBACK_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                debug!("found tesseract at {}", path.display());
                return Ok(Self::at(path.to_path_buf(), language));
            }
        }

        Err(OcrError::EngineNotFound)
    }

    fn at(binary: PathBuf, language: &str) -> Self {
        // One scratch file per process; the loop is the only writer.
        let scratch = std::env::temp_dir().join(format!("capscribe-frame-{}.png", std::process::id()));
        Self {
            binary,
            language: language.to_string(),
            scratch,
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, frame: &RgbaImage) -> Result<String, OcrError> {
        frame.save_with_format(&self.scratch, ImageFormat::Png)?;

        let output = Command::new(&self.binary)
            .arg(&self.scratch)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Drop for TesseractOcr {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.scratch);
    }
}

/// Probe whether a binary by this name answers `--version` on PATH.
fn binary_responds(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
