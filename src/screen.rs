//! Window enumeration and pixel capture via xcap.
//!
//! Thin shim over the OS capture backend; the merge engine only ever sees
//! the resulting frames through the
//! [`FrameSource`](crate::capture::FrameSource) contract.

use image::RgbaImage;
use log::debug;
use xcap::Window;

use crate::capture::{CaptureError, FrameSource};

/// Titles of every capturable, non-minimized window. Useful for picking a
/// capture target.
pub fn list_window_titles() -> Result<Vec<String>, CaptureError> {
    let windows = Window::all().map_err(|err| CaptureError::Backend(err.to_string()))?;

    let mut titles = Vec::new();
    for window in windows {
        if window.is_minimized().unwrap_or(false) {
            continue;
        }
        if let Ok(title) = window.title() {
            if !title.trim().is_empty() {
                titles.push(title);
            }
        }
    }

    Ok(titles)
}

/// Captures whichever visible window's title contains the configured
/// fragment, case-insensitively. The window is re-resolved on every poll,
/// so a caption overlay that closes and reopens is picked up again without
/// restarting the session.
pub struct WindowSource {
    title_fragment: String,
}

impl WindowSource {
    pub fn new(title_fragment: impl Into<String>) -> Self {
        Self {
            title_fragment: title_fragment.into(),
        }
    }

    fn find_window(&self) -> Result<Option<Window>, CaptureError> {
        let needle = self.title_fragment.to_lowercase();
        let windows = Window::all().map_err(|err| CaptureError::Backend(err.to_string()))?;

        for window in windows {
            if window.is_minimized().unwrap_or(false) {
                continue;
            }
            let title = match window.title() {
                Ok(title) => title,
                Err(_) => continue,
            };
            if title.to_lowercase().contains(&needle) {
                return Ok(Some(window));
            }
        }

        Ok(None)
    }
}

impl FrameSource for WindowSource {
    fn capture(&mut self) -> Result<Option<RgbaImage>, CaptureError> {
        let window = match self.find_window()? {
            Some(window) => window,
            None => {
                debug!("no window matching {:?}", self.title_fragment);
                return Ok(None);
            }
        };

        let frame = window
            .capture_image()
            .map_err(|err| CaptureError::Backend(err.to_string()))?;

        Ok(Some(frame))
    }
}
