//! Story Client. Drafts the page-delimited story text.
//!
//! Fails loudly: missing credentials, transport errors, and empty replies all
//! surface as `GeminiError`. There is no placeholder story.

use tracing::{debug, info};

use crate::gemini::{Content, GeminiClient, GeminiError, Modality, Part, STORY_MODEL};
use crate::models::StoryText;

/// Typographic glyphs replaced with plain-ASCII equivalents.
const PUNCTUATION_MAP: [(char, &str); 6] = [
    ('\u{2026}', "..."), // ellipsis
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2014}', "--"),  // em-dash
];

#[derive(Clone)]
pub struct StoryClient {
    gemini: GeminiClient,
}

impl StoryClient {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub async fn generate_story(&self, prompt: &str) -> Result<StoryText, GeminiError> {
        info!("Requesting story text from {STORY_MODEL}");
        let contents = [Content::user(vec![Part::text(prompt)])];
        let response = self
            .gemini
            .generate(STORY_MODEL, &contents, Modality::Text)
            .await?;

        let raw = response.text().ok_or(GeminiError::EmptyContent)?;
        let story = StoryText::new(normalize_punctuation(&raw));
        debug!(
            "Story received: {} pages, {} bytes",
            story.pages().len(),
            story.as_str().len()
        );
        Ok(story)
    }
}

/// Replaces curly quotes, ellipsis and em-dash with ASCII and normalizes CRLF.
///
/// Idempotent: none of the replacement strings contain a source glyph.
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match PUNCTUATION_MAP.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_every_glyph() {
        let input =
            "\u{201C}Wait\u{2026}\u{201D} she said \u{2014} it\u{2019}s \u{2018}fun\u{2019}";
        let out = normalize_punctuation(input);
        assert_eq!(out, "\"Wait...\" she said -- it's 'fun'");
        for (glyph, _) in PUNCTUATION_MAP {
            assert!(!out.contains(glyph), "{glyph:?} survived normalization");
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Plain ASCII text stays put.",
            "\u{2026}\u{2026}\u{2014}\u{2014}",
            "Mom\u{2019}s \u{201C}armadillo\u{201D} question\r\n\r\nPage two",
        ];
        for sample in samples {
            let once = normalize_punctuation(sample);
            assert_eq!(normalize_punctuation(&once), once);
        }
    }

    #[test]
    fn test_normalize_keeps_page_delimiter() {
        let out = normalize_punctuation("One\r\n\r\nTwo");
        assert_eq!(StoryText::new(out).pages(), vec!["One", "Two"]);
    }

    #[test]
    fn test_normalize_leaves_other_unicode_alone() {
        assert_eq!(normalize_punctuation("caf\u{e9} \u{2013}"), "caf\u{e9} \u{2013}");
    }

    #[tokio::test]
    async fn test_generate_story_without_credentials_fails_loudly() {
        let client = StoryClient::new(GeminiClient::new(String::new()));
        let result = client.generate_story("Write a story").await;
        assert!(matches!(result, Err(GeminiError::MissingCredentials)));
    }
}
