//! Host clipboard publishing.
//!
//! The selection layer hands a sentence subsequence to a sink; the system
//! sink shells out to the platform clipboard tool, so nothing here links
//! against a display server.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard tool available on this platform")]
    NoBackend,
    #[error("clipboard tool exited with {0}")]
    ToolFailed(ExitStatus),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Destination for selected sentences.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(all(unix, not(target_os = "macos")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Pipes text into the first host clipboard tool that exists.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in CLIPBOARD_TOOLS {
            match pipe_to(program, args, text) {
                Ok(()) => return Ok(()),
                // Tool not installed: try the next one.
                Err(ClipboardError::Io(err)) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            }
        }
        Err(ClipboardError::NoBackend)
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::ToolFailed(status))
    }
}

/// Join a selected sentence subsequence with newlines and publish it.
pub fn copy_sentences<S: ClipboardSink>(
    sink: &mut S,
    sentences: &[String],
) -> Result<(), ClipboardError> {
    sink.set_text(&sentences.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        published: Vec<String>,
    }

    impl ClipboardSink for RecordingSink {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.published.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_joins_with_newline() {
        let mut sink = RecordingSink::default();
        let sentences = vec!["First one.".to_string(), "Second one.".to_string()];

        copy_sentences(&mut sink, &sentences).unwrap();
        assert_eq!(sink.published, ["First one.\nSecond one."]);
    }

    #[test]
    fn test_copy_empty_selection() {
        let mut sink = RecordingSink::default();
        copy_sentences(&mut sink, &[]).unwrap();
        assert_eq!(sink.published, [""]);
    }
}
