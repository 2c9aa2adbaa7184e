// All prompt text sent to the generative services.
// Templates use `{placeholder}` slots filled by the builders below.

use crate::models::StoryRequest;

/// Number of pages the story prompt asks for.
pub const STORY_PAGE_COUNT: usize = 5;
/// Maximum rhyming lines per page.
pub const LINES_PER_PAGE: usize = 4;

/// Story prompt template.
/// Replace: {pages}, {memory}, {protagonist}, {details}, {tone}, {style},
///          {complexity}, {lines}
pub const STORY_PROMPT_TEMPLATE: &str = "\
Write a {pages}-page story about a memory. \
CRITICAL: The story MUST be written from the **parent's point of view**. \
The narrator (the 'I' in the story) is the parent, never the child. \
THE MEMORY: {memory}. \
CHARACTERS: The parent (narrator) and their child, {protagonist}. \
DETAILS: {details}. \
The tone must be {tone}. \
The style must be: {style}. \
The reading complexity must be: {complexity}. \
Each of the {pages} pages MUST have a maximum of {lines} rhyming lines. \
The rhymes MUST be strong and clear (e.g., 'day'/'play', not 'mom'/'jam'). \
Format the output so that each page is separated by a double newline ('\\n\\n').";

/// Cover pattern prompt template. Replace: {theme}
pub const COVER_PROMPT_TEMPLATE: &str = "\
Generate a beautiful, seamless, repeating pattern for a children's storybook cover. \
The theme should be '{theme}'. \
Style: playful, colorful, simple cartoon. \
CRITICAL: DO NOT include any text or words. \
DO NOT draw malformed animals, extra limbs, or distorted features.";

/// Illustration style guide template.
/// Replace: {main_character}, {other_characters}, {setting}
pub const STYLE_GUIDE_TEMPLATE: &str = "\
STYLE: You are an illustrator for a single children's storybook. \
You must use one CONSISTENT style (whimsical, colorful, cartoon). \
MAIN CHARACTER: '{main_character}'. \
OTHER CHARACTERS: '{other_characters}'. \
SETTING: {setting}. Each scene prompt will describe a specific room. \
The setting MUST match the prompt. Do NOT merge scenes (e.g., no bathtubs in kitchens).";

/// Negative prompt seeded alongside the style guide.
pub const NEGATIVE_PROMPT: &str = "\
CRITICAL: DO NOT include any text, words, letters, or speech bubbles. \
DO NOT draw malformed bodies, distorted faces, dead eyes, \
zombie-like or uncanny valley expressions, disfigured features, or missing limbs. \
All characters must be drawn correctly, with happy, natural expressions.";

/// Canned model turn that closes the illustration session preamble.
pub const STYLE_ACKNOWLEDGEMENT: &str = "\
Okay, I understand. I will draw in one consistent style, keeping the characters \
and setting consistent. I will not draw text or malformed bodies.";

/// Prefix for each per-page illustration turn.
pub const SCENE_PREFIX: &str = "SCENE: ";

/// Character and setting description shared by every illustration of one book.
#[derive(Debug, Clone, PartialEq)]
pub struct IllustrationBrief {
    pub main_character: String,
    pub other_characters: String,
    pub setting: String,
}

impl IllustrationBrief {
    pub fn from_request(request: &StoryRequest) -> Self {
        Self {
            main_character: request.character_description.clone(),
            other_characters: request.other_characters.clone(),
            setting: request.details.clone(),
        }
    }
}

pub fn build_story_prompt(request: &StoryRequest) -> String {
    let pages = STORY_PAGE_COUNT.to_string();
    let lines = LINES_PER_PAGE.to_string();
    fill_template(
        STORY_PROMPT_TEMPLATE,
        &[
            ("pages", pages.as_str()),
            ("lines", lines.as_str()),
            ("memory", request.memory.trim()),
            ("protagonist", request.protagonist.trim()),
            ("details", request.details.trim()),
            ("tone", request.tone.trim()),
            ("style", request.style.trim()),
            ("complexity", request.complexity.trim()),
        ],
    )
}

pub fn build_cover_prompt(theme: &str) -> String {
    fill_template(COVER_PROMPT_TEMPLATE, &[("theme", theme.trim())])
}

pub fn build_style_guide(brief: &IllustrationBrief) -> String {
    fill_template(
        STYLE_GUIDE_TEMPLATE,
        &[
            ("main_character", brief.main_character.trim()),
            ("other_characters", brief.other_characters.trim()),
            ("setting", brief.setting.trim()),
        ],
    )
}

pub fn build_scene_prompt(page_text: &str) -> String {
    format!("{SCENE_PREFIX}{page_text}")
}

/// Fills `{name}` slots in one left-to-right pass.
///
/// Inserted values are never rescanned, so user text containing `{tone}` stays
/// literal. Braces that do not name a known slot are copied through.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let filled = after.find('}').and_then(|end| {
            let name = &after[..end];
            slots
                .iter()
                .find(|(slot, _)| *slot == name)
                .map(|(_, value)| (*value, end))
        });
        match filled {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StoryRequest {
        StoryRequest {
            memory: "We built a blanket fort".to_string(),
            protagonist: "Leo".to_string(),
            tone: "Tender".to_string(),
            style: "Rhyming".to_string(),
            complexity: "Short".to_string(),
            details: "The living room on a rainy day".to_string(),
            ..StoryRequest::default()
        }
    }

    #[test]
    fn test_story_prompt_fills_every_slot() {
        let prompt = build_story_prompt(&request());
        assert!(!prompt.contains('{'), "unfilled slot in: {prompt}");
        assert!(prompt.contains("Write a 5-page story"));
        assert!(prompt.contains("THE MEMORY: We built a blanket fort."));
        assert!(prompt.contains("their child, Leo"));
        assert!(prompt.contains("The tone must be Tender."));
        assert!(prompt.contains("maximum of 4 rhyming lines"));
        assert!(prompt.contains("complexity must be: Short"));
    }

    #[test]
    fn test_story_prompt_requires_parent_narrator_and_delimiter() {
        let prompt = build_story_prompt(&request());
        assert!(prompt.contains("parent's point of view"));
        assert!(prompt.contains("never the child"));
        assert!(prompt.contains("double newline ('\\n\\n')"));
    }

    #[test]
    fn test_story_prompt_is_deterministic() {
        assert_eq!(build_story_prompt(&request()), build_story_prompt(&request()));
    }

    #[test]
    fn test_cover_prompt_forbids_text_and_malformed_anatomy() {
        let prompt = build_cover_prompt(" armadillos and flowers ");
        assert!(prompt.contains("The theme should be 'armadillos and flowers'."));
        assert!(prompt.contains("seamless"));
        assert!(prompt.contains("DO NOT include any text"));
        assert!(prompt.contains("extra limbs"));
    }

    #[test]
    fn test_style_guide_carries_characters_and_setting() {
        let brief = IllustrationBrief::from_request(&request());
        let guide = build_style_guide(&brief);
        assert!(guide.contains(&format!("MAIN CHARACTER: '{}'", brief.main_character)));
        assert!(guide.contains(&format!("OTHER CHARACTERS: '{}'", brief.other_characters)));
        assert!(guide.contains("SETTING: The living room on a rainy day."));
        assert!(guide.contains("Do NOT merge scenes"));
    }

    #[test]
    fn test_negative_prompt_covers_text_and_anatomy() {
        assert!(NEGATIVE_PROMPT.contains("speech bubbles"));
        assert!(NEGATIVE_PROMPT.contains("letters"));
        assert!(NEGATIVE_PROMPT.contains("distorted faces"));
    }

    #[test]
    fn test_user_text_with_slot_names_stays_literal() {
        let mut r = request();
        r.memory = "She sang {tone} all day".to_string();
        r.details = "A sign read {complexity}".to_string();
        let prompt = build_story_prompt(&r);
        assert!(prompt.contains("THE MEMORY: She sang {tone} all day."));
        assert!(prompt.contains("DETAILS: A sign read {complexity}."));
        assert!(prompt.contains("The tone must be Tender."));
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unclosed_braces() {
        assert_eq!(
            fill_template("{a} {b} {a", &[("a", "x{b}")]),
            "x{b} {b} {a"
        );
    }

    #[test]
    fn test_scene_prompt_prefix() {
        assert_eq!(build_scene_prompt("Maya hops"), "SCENE: Maya hops");
    }
}
