//! Sentence reconstruction from merged caption lines.
//!
//! Flattens the line history into prose and re-segments it into complete
//! sentences, protecting known abbreviations from being read as sentence
//! boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviations that must not terminate a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "Inc.", "Ltd.", "Co.", "Corp.", "etc.",
    "vs.", "e.g.", "i.e.", "U.S.", "U.K.", "U.N.", "No.", "St.", "Ave.", "Blvd.", "Rd.", "Dept.",
    "Gov.", "Rep.", "Sen.",
];

/// A sentence terminator followed by whitespace. Whether it really closes
/// a sentence depends on the character after the whitespace, which is
/// peeked separately (the regex crate has no lookahead).
static BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Segmentation strategy: which abbreviations are protected from being
/// mistaken for sentence boundaries. Substituting a different list adapts
/// the reconstructor to another locale without touching the merge engine.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: Vec<String>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATIONS.iter().map(|abbr| abbr.to_string()))
    }
}

impl SentenceSegmenter {
    pub fn new(abbreviations: impl IntoIterator<Item = String>) -> Self {
        Self {
            abbreviations: abbreviations.into_iter().collect(),
        }
    }

    /// Flatten a line sequence into prose and split it into sentences.
    ///
    /// Pure and total: unchanged lines produce identical output, and no
    /// well-formed input panics. The trailing remainder is emitted as a
    /// final, possibly unterminated sentence - it re-forms on the next
    /// rebuild once the captions extend it.
    pub fn rebuild_sentences(&self, lines: &[String]) -> Vec<String> {
        let full_text = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full_text.is_empty() {
            return Vec::new();
        }

        let (masked, placeholders) = self.mask_abbreviations(&full_text);

        let mut sentences = split_at_boundaries(&masked);

        for sentence in &mut sentences {
            for (placeholder, abbr) in &placeholders {
                if sentence.contains(placeholder.as_str()) {
                    *sentence = sentence.replace(placeholder.as_str(), abbr);
                }
            }
        }

        sentences
            .into_iter()
            .map(|sentence| sentence.trim().to_string())
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// Replace literal abbreviation occurrences with placeholder tokens
    /// that contain no terminator characters. The list index keys the
    /// placeholder, so numbering is stable across calls.
    fn mask_abbreviations(&self, text: &str) -> (String, Vec<(String, String)>) {
        let mut masked = text.to_string();
        let mut placeholders = Vec::new();

        for (i, abbr) in self.abbreviations.iter().enumerate() {
            if masked.contains(abbr.as_str()) {
                let placeholder = format!("__ABBR_{i}__");
                masked = masked.replace(abbr.as_str(), &placeholder);
                placeholders.push((placeholder, abbr.clone()));
            }
        }

        (masked, placeholders)
    }
}

/// Split at every terminator + whitespace boundary whose following
/// character is an ASCII uppercase letter or digit. The terminator stays
/// with the sentence it closes; the unconsumed remainder becomes the last
/// entry.
fn split_at_boundaries(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;

    for boundary in BOUNDARY.find_iter(text) {
        let next = text[boundary.end()..].chars().next();
        let opens_sentence =
            matches!(next, Some(c) if c.is_ascii_uppercase() || c.is_ascii_digit());
        if opens_sentence {
            // Terminators are single-byte ASCII, so start()+1 is a char
            // boundary.
            sentences.push(text[start..boundary.start() + 1].to_string());
            start = boundary.end();
        }
    }

    if start < text.len() {
        sentences.push(text[start..].to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(lines: &[&str]) -> Vec<String> {
        let segmenter = SentenceSegmenter::default();
        let lines: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        segmenter.rebuild_sentences(&lines)
    }

    #[test]
    fn test_empty_input() {
        assert!(rebuild(&[]).is_empty());
        assert!(rebuild(&["", "   ", "\t"]).is_empty());
    }

    #[test]
    fn test_single_unterminated_line() {
        assert_eq!(rebuild(&["still being spoken"]), ["still being spoken"]);
    }

    #[test]
    fn test_basic_segmentation() {
        assert_eq!(
            rebuild(&["First thing happened. Then another thing."]),
            ["First thing happened.", "Then another thing."]
        );
    }

    #[test]
    fn test_sentences_span_lines() {
        assert_eq!(
            rebuild(&["this caption continues", "onto the next line. And ends."]),
            ["this caption continues onto the next line.", "And ends."]
        );
    }

    #[test]
    fn test_abbreviation_not_a_boundary() {
        assert_eq!(
            rebuild(&["Dr. Smith went home. He was tired."]),
            ["Dr. Smith went home.", "He was tired."]
        );
    }

    #[test]
    fn test_multiple_abbreviations() {
        assert_eq!(
            rebuild(&["The U.S. government met Mrs. Jones at 3 p.m. today. Nothing happened."]),
            [
                "The U.S. government met Mrs. Jones at 3 p.m. today.",
                "Nothing happened."
            ]
        );
    }

    #[test]
    fn test_question_and_exclamation_marks() {
        assert_eq!(
            rebuild(&["Are you sure? Yes! Completely certain."]),
            ["Are you sure?", "Yes!", "Completely certain."]
        );
    }

    #[test]
    fn test_digit_opens_sentence() {
        assert_eq!(
            rebuild(&["The meeting ended. 20 people attended."]),
            ["The meeting ended.", "20 people attended."]
        );
    }

    #[test]
    fn test_boundary_needs_uppercase_or_digit() {
        // A digit after the terminator opens a sentence...
        assert_eq!(
            rebuild(&["it cost 3. 50 in total"]),
            ["it cost 3.", "50 in total"]
        );
        // ...a lowercase letter does not.
        assert_eq!(
            rebuild(&["version 2. beta was unstable"]),
            ["version 2. beta was unstable"]
        );
    }

    #[test]
    fn test_determinism() {
        let lines = vec![
            "Dr. Smith went home. He was tired.".to_string(),
            "Then he slept. Soundly.".to_string(),
        ];
        let segmenter = SentenceSegmenter::default();
        assert_eq!(
            segmenter.rebuild_sentences(&lines),
            segmenter.rebuild_sentences(&lines)
        );
    }

    #[test]
    fn test_custom_abbreviation_set() {
        let segmenter = SentenceSegmenter::new(vec!["Abt.".to_string()]);
        let lines = vec!["Abt. Mueller sprach. Dann ging er.".to_string()];
        assert_eq!(
            segmenter.rebuild_sentences(&lines),
            ["Abt. Mueller sprach.", "Dann ging er."]
        );
    }

    #[test]
    fn test_trailing_abbreviation_restored() {
        assert_eq!(rebuild(&["He moved to the U.S."]), ["He moved to the U.S."]);
    }
}
