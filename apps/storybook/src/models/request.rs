use serde::{Deserialize, Serialize};

/// Everything the user tells us about the memory, collected once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub memory: String,
    pub protagonist: String,
    pub character_description: String,
    pub tone: String,
    /// Setting details; also used to keep illustrated scenes apart.
    pub details: String,
    pub style: String,
    /// Reading level: Short, Standard or Advanced.
    pub complexity: String,
    pub title: String,
    /// Back-cover message. Empty means no back cover.
    pub end_message: String,
    pub other_characters: String,
    pub cover_theme: String,
    pub theme_color: String,
}

impl Default for StoryRequest {
    fn default() -> Self {
        Self {
            memory: "I had my daughter ask as I was going to the bathroom when she was three: \
                     what do you know about armadillos?"
                .to_string(),
            protagonist: "Maya".to_string(),
            character_description: "a 3-year-old girl with brown curly hair and big brown eyes"
                .to_string(),
            tone: "Funny".to_string(),
            details: "The setting is our family home. The story scenes take place in a hallway \
                      and a bathroom."
                .to_string(),
            style: "Rhyming".to_string(),
            complexity: "Standard".to_string(),
            title: "Silly Maya \"Muffin\" Elwer".to_string(),
            end_message: "Merry Christmas! Love, Mom!".to_string(),
            other_characters: "The narrator, 'mom', is a woman with blonde hair.".to_string(),
            cover_theme: "armadillos and flowers".to_string(),
            theme_color: "light blue".to_string(),
        }
    }
}

/// Output filename derived from the protagonist: lowercase, spaces to `_`, fixed suffix.
pub fn output_filename(protagonist: &str) -> String {
    format!("{}_storybook.pdf", protagonist.to_lowercase().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filename_multi_word_name() {
        assert_eq!(
            output_filename("Sarah Jane Smith"),
            "sarah_jane_smith_storybook.pdf"
        );
    }

    #[test]
    fn test_output_filename_single_word() {
        assert_eq!(output_filename("Maya"), "maya_storybook.pdf");
    }

    #[test]
    fn test_default_request_has_every_field_filled() {
        let r = StoryRequest::default();
        for field in [
            &r.memory,
            &r.protagonist,
            &r.character_description,
            &r.tone,
            &r.details,
            &r.style,
            &r.complexity,
            &r.title,
            &r.end_message,
            &r.other_characters,
            &r.cover_theme,
            &r.theme_color,
        ] {
            assert!(!field.trim().is_empty());
        }
    }
}
