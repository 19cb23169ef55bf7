//! Best-effort title generation for freshly imported conversations.
//!
//! Title generation is an enrichment, not part of the import pipeline: it
//! consumes the plain-text projection of an already-imported conversation and
//! feeds back nothing but a title string. A generator that returns `None` (or
//! a rename that fails) leaves the default title — the session identifier —
//! in place, and never fails the import.

/// Produces a display title from conversation text. Pure text-in/text-out.
pub trait TitleGenerator {
    /// Return a title for the given conversation text, or `None` when no
    /// title could be produced (model unavailable, generation failed, ...).
    fn generate(&self, conversation_text: &str) -> Option<String>;
}

/// Generator that never produces a title; imports keep the default.
pub struct NoTitles;

impl TitleGenerator for NoTitles {
    fn generate(&self, _conversation_text: &str) -> Option<String> {
        None
    }
}

/// Deterministic fallback generator: the first non-empty line of the
/// conversation, truncated to a displayable length.
pub struct FirstLineTitles {
    max_chars: usize,
}

impl FirstLineTitles {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for FirstLineTitles {
    fn default() -> Self {
        Self::new(48)
    }
}

impl TitleGenerator for FirstLineTitles {
    fn generate(&self, conversation_text: &str) -> Option<String> {
        let first_line = conversation_text.lines().map(str::trim).find(|l| !l.is_empty())?;
        if first_line.chars().count() <= self.max_chars {
            Some(first_line.to_string())
        } else {
            let mut title: String = first_line.chars().take(self.max_chars).collect();
            title.push('…');
            Some(title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_titles_always_none() {
        assert_eq!(NoTitles.generate("anything at all"), None);
    }

    #[test]
    fn test_first_line_short() {
        let titles = FirstLineTitles::default();
        assert_eq!(titles.generate("fix the parser\nplease"), Some("fix the parser".into()));
    }

    #[test]
    fn test_first_line_skips_blank_lines() {
        let titles = FirstLineTitles::default();
        assert_eq!(titles.generate("\n  \nreal content"), Some("real content".into()));
    }

    #[test]
    fn test_first_line_truncates() {
        let titles = FirstLineTitles::new(5);
        assert_eq!(titles.generate("abcdefgh"), Some("abcde…".into()));
    }

    #[test]
    fn test_empty_text_yields_none() {
        assert_eq!(FirstLineTitles::default().generate("   \n"), None);
    }
}
