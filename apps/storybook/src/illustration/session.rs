//! Explicit multi-turn context for the illustration conversation.
//!
//! The session is a plain value: `scene_request` builds what to send next, and
//! `record` consumes the session and returns it extended with the exchange.
//! Nothing is hidden in the client, so the consistency mechanism can be
//! checked without a network.

use crate::gemini::{Content, Part};
use crate::story::prompts::{
    build_scene_prompt, build_style_guide, IllustrationBrief, NEGATIVE_PROMPT,
    STYLE_ACKNOWLEDGEMENT,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IllustrationSession {
    pub style_guide: String,
    pub negative_prompt: String,
    transcript: Vec<Content>,
}

impl IllustrationSession {
    /// Starts a session with the style guide, negative prompt and canned acknowledgement.
    pub fn seed(brief: &IllustrationBrief) -> Self {
        let style_guide = build_style_guide(brief);
        let negative_prompt = NEGATIVE_PROMPT.to_string();
        let transcript = vec![
            Content::user(vec![
                Part::text(style_guide.clone()),
                Part::text(negative_prompt.clone()),
            ]),
            Content::model(vec![Part::text(STYLE_ACKNOWLEDGEMENT)]),
        ];
        Self {
            style_guide,
            negative_prompt,
            transcript,
        }
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &[Content] {
        &self.transcript
    }

    /// Completed scene exchanges so far (excludes the preamble).
    pub fn scenes_recorded(&self) -> usize {
        self.transcript.len().saturating_sub(2) / 2
    }

    /// Full contents to send for the next scene: transcript plus the new user turn.
    pub fn scene_request(&self, page_text: &str) -> Vec<Content> {
        let mut contents = self.transcript.clone();
        contents.push(scene_turn(page_text));
        contents
    }

    /// Appends the scene turn and the model reply.
    ///
    /// A missing reply leaves the transcript untouched so roles keep alternating.
    pub fn record(mut self, page_text: &str, reply: Option<Content>) -> Self {
        if let Some(reply) = reply {
            self.transcript.push(scene_turn(page_text));
            self.transcript.push(Content {
                role: Some("model".to_string()),
                parts: reply.parts,
            });
        }
        self
    }
}

fn scene_turn(page_text: &str) -> Content {
    Content::user(vec![Part::text(build_scene_prompt(page_text))])
}
