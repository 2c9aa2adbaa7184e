//! Interactive collection of the `StoryRequest`.
//!
//! Each prompt shows its default and accepts it on empty input. When nobody is
//! at the terminal the defaults are used as-is.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

use crate::errors::AppError;
use crate::models::StoryRequest;

pub fn collect_request() -> Result<StoryRequest, AppError> {
    let defaults = StoryRequest::default();
    if !console::user_attended() {
        info!("No interactive terminal, using default story inputs");
        return Ok(defaults);
    }

    println!("{}", style("Let's make a storybook!").bold());
    let theme = ColorfulTheme::default();

    Ok(StoryRequest {
        memory: Input::with_theme(&theme)
            .with_prompt("Enter a core memory (press Enter for the armadillo story)")
            .default(defaults.memory)
            .show_default(false)
            .interact_text()?,
        protagonist: ask(&theme, "Main character's name", defaults.protagonist)?,
        character_description: ask(
            &theme,
            "Describe the main character",
            defaults.character_description,
        )?,
        tone: ask(&theme, "Tone (e.g. Funny, Sweet, Adventurous)", defaults.tone)?,
        details: ask(&theme, "Setting details", defaults.details)?,
        style: ask(&theme, "Writing style (e.g. Rhyming, Prose)", defaults.style)?,
        complexity: ask(&theme, "Complexity (Short, Standard, Advanced)", defaults.complexity)?,
        title: ask(&theme, "Book title", defaults.title)?,
        end_message: ask(&theme, "Back-cover message", defaults.end_message)?,
        other_characters: ask(&theme, "Other characters", defaults.other_characters)?,
        cover_theme: ask(&theme, "Cover pattern theme", defaults.cover_theme)?,
        theme_color: ask(
            &theme,
            "Theme color (e.g. light blue, light pink)",
            defaults.theme_color,
        )?,
    })
}

fn ask(theme: &ColorfulTheme, prompt: &str, default: String) -> Result<String, AppError> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact_text()?;
    Ok(value.trim().to_string())
}
