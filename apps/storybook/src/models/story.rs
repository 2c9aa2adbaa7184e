//! Generated story text and its page segmentation.

use serde::{Deserialize, Serialize};

/// Page delimiter: one blank line.
const PAGE_DELIMITER: &str = "\n\n";

/// Story text as returned by the story client, already punctuation-normalized.
///
/// Pages are separated by a blank line; page N pairs with illustration N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryText(String);

impl StoryText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ordered page segments. Segments are trimmed; blank ones are dropped.
    pub fn pages(&self) -> Vec<&str> {
        self.0
            .split(PAGE_DELIMITER)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_split_on_blank_line() {
        let story = StoryText::new("Line one\nLine two\n\nPage two here\n\nPage three");
        assert_eq!(
            story.pages(),
            vec!["Line one\nLine two", "Page two here", "Page three"]
        );
    }

    #[test]
    fn test_pages_drop_blank_segments_and_trailing_newlines() {
        let story = StoryText::new("\n\nFirst\n\n\n\nSecond\n\n");
        assert_eq!(story.pages(), vec!["First", "Second"]);
    }

    #[test]
    fn test_pages_of_empty_story() {
        assert!(StoryText::new("   ").pages().is_empty());
    }
}
