//! Best-effort language tagging
//!
//! Tags are ISO 15924 script codes (`Latn`, `Cyrl`, `Hani`, ...). A value
//! without letters yields no tag; that is not an error.

use std::collections::HashMap;

/// Something that can attach a language tag to a text value
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of a single value, `None` if undecidable
    fn detect(&self, text: &str) -> Option<String>;
}

/// Detector that tags text with its dominant Unicode script
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for c in text.chars() {
            if let Some(script) = script_of(c) {
                *counts.entry(script).or_insert(0) += 1;
            }
        }
        dominant(counts).map(str::to_string)
    }
}

fn script_of(c: char) -> Option<&'static str> {
    match c {
        'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => Some("Latn"),
        '\u{0370}'..='\u{03FF}' => Some("Grek"),
        '\u{0400}'..='\u{04FF}' => Some("Cyrl"),
        '\u{0590}'..='\u{05FF}' => Some("Hebr"),
        '\u{0600}'..='\u{06FF}' => Some("Arab"),
        '\u{0900}'..='\u{097F}' => Some("Deva"),
        '\u{0E00}'..='\u{0E7F}' => Some("Thai"),
        '\u{1100}'..='\u{11FF}' | '\u{AC00}'..='\u{D7AF}' => Some("Hang"),
        '\u{3040}'..='\u{30FF}' => Some("Jpan"),
        '\u{4E00}'..='\u{9FFF}' => Some("Hani"),
        _ => None,
    }
}

/// Most frequent key; ties go to the alphabetically first key so the
/// result does not depend on hash order
pub(crate) fn dominant<K: Ord>(counts: HashMap<K, usize>) -> Option<K> {
    counts
        .into_iter()
        .max_by(|(ka, a), (kb, b)| a.cmp(b).then_with(|| kb.cmp(ka)))
        .map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_scripts() {
        let detector = ScriptDetector;
        assert_eq!(detector.detect("New York").as_deref(), Some("Latn"));
        assert_eq!(detector.detect("Москва").as_deref(), Some("Cyrl"));
        assert_eq!(detector.detect("東京").as_deref(), Some("Hani"));
        assert_eq!(detector.detect("Αθήνα").as_deref(), Some("Grek"));
    }

    #[test]
    fn test_no_letters_no_tag() {
        assert_eq!(ScriptDetector.detect("12-34 !"), None);
        assert_eq!(ScriptDetector.detect(""), None);
    }

    #[test]
    fn test_dominant_tie_break() {
        let mut counts = HashMap::new();
        counts.insert("b", 2);
        counts.insert("a", 2);
        counts.insert("c", 1);
        assert_eq!(dominant(counts), Some("a"));
    }
}
