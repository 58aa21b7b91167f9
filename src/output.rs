//! Output formatting for transcript state (plain text, JSON).

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::models::TranscriptDump;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a transcript snapshot as pretty-printed JSON.
pub fn write_json<W: Write>(dump: &TranscriptDump, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(dump)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write a transcript snapshot as JSON to a file.
pub fn write_json_file(dump: &TranscriptDump, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(dump, &mut file)
}

/// Write sentences one per line.
pub fn write_text<W: Write>(sentences: &[String], writer: &mut W) -> Result<(), OutputError> {
    for sentence in sentences {
        writeln!(writer, "{sentence}")?;
    }
    Ok(())
}

/// Write sentences one per line to a file.
pub fn write_text_file(sentences: &[String], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_text(sentences, &mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergeParams;

    #[test]
    fn test_text_output() {
        let sentences = vec!["One.".to_string(), "Two.".to_string()];
        let mut buf = Vec::new();
        write_text(&sentences, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "One.\nTwo.\n");
    }

    #[test]
    fn test_json_output_roundtrips() {
        let dump = TranscriptDump {
            params: MergeParams::default(),
            lines: vec!["raw line".to_string()],
            sentences: vec!["A sentence.".to_string()],
        };

        let mut buf = Vec::new();
        write_json(&dump, &mut buf).unwrap();

        let parsed: TranscriptDump = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.lines, dump.lines);
        assert_eq!(parsed.sentences, dump.sentences);
    }
}
