//! Image Client: cover pattern plus one illustration per story page.
//!
//! Failure policy:
//! - cover: missing credentials, no image in the reply, or a failed write → `Ok(None)`.
//! - pages: a reply with no image (or a failed write) leaves a `None` gap at that
//!   page's index; results are always page-aligned.
//! - any transport/API failure → `Err`, which the pipeline treats as fatal.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::gemini::{Content, GeminiClient, GeminiError, Modality, Part, IMAGE_MODEL};
use crate::illustration::assets::{cover_path, page_image_path, save_inline_image};
use crate::illustration::IllustrationSession;
use crate::models::StoryText;
use crate::story::prompts::{build_cover_prompt, IllustrationBrief};

#[derive(Clone)]
pub struct ImageClient {
    gemini: GeminiClient,
    output_dir: PathBuf,
}

impl ImageClient {
    pub fn new(gemini: GeminiClient, output_dir: PathBuf) -> Self {
        Self { gemini, output_dir }
    }

    /// One-shot cover pattern request; returns the saved file path if an image came back.
    pub async fn generate_cover(&self, theme: &str) -> Result<Option<PathBuf>, GeminiError> {
        if !self.gemini.has_credentials() {
            error!("Cannot generate cover image: API key is missing");
            return Ok(None);
        }

        let contents = [Content::user(vec![Part::text(build_cover_prompt(theme))])];
        let response = self
            .gemini
            .generate(IMAGE_MODEL, &contents, Modality::TextAndImage)
            .await?;

        let Some(image) = response.first_inline_image() else {
            warn!("Cover request succeeded but the reply carried no image");
            return Ok(None);
        };

        let path = cover_path(&self.output_dir, &image.mime_type);
        match save_inline_image(image, path).await {
            Ok(path) => {
                info!("Saved cover pattern to {}", path.display());
                Ok(Some(path))
            }
            Err(e) => {
                error!("Failed to save cover pattern: {e}");
                Ok(None)
            }
        }
    }

    /// Illustrates every page of `story` within one consistent session.
    ///
    /// The returned vector has one entry per page; `None` marks a page without artwork.
    pub async fn generate_illustrations(
        &self,
        story: &StoryText,
        brief: &IllustrationBrief,
    ) -> Result<Vec<Option<PathBuf>>, GeminiError> {
        let pages = story.pages();
        if pages.is_empty() {
            warn!("Story text was empty, no illustrations to generate");
            return Ok(Vec::new());
        }
        if !self.gemini.has_credentials() {
            return Err(GeminiError::MissingCredentials);
        }

        info!("Generating {} illustrations (one per page)", pages.len());
        let mut session = IllustrationSession::seed(brief);
        let mut paths = Vec::with_capacity(pages.len());

        for (index, page_text) in pages.iter().enumerate() {
            info!("Sending scene for page {}", index + 1);
            let request = session.scene_request(page_text);
            let response = self
                .gemini
                .generate(IMAGE_MODEL, &request, Modality::TextAndImage)
                .await?;

            let saved = match response.first_inline_image() {
                Some(image) => {
                    let path = page_image_path(&self.output_dir, index, &image.mime_type);
                    match save_inline_image(image, path).await {
                        Ok(path) => {
                            info!("Saved illustration to {}", path.display());
                            Some(path)
                        }
                        Err(e) => {
                            error!("Failed to save illustration for page {}: {e}", index + 1);
                            None
                        }
                    }
                }
                None => {
                    warn!(
                        "Image call worked for page {}, but no image data was returned",
                        index + 1
                    );
                    None
                }
            };
            paths.push(saved);

            session = session.record(page_text, response.first_content().cloned());
            debug!("Illustration session holds {} scenes", session.scenes_recorded());
        }

        let missing = paths.iter().filter(|p| p.is_none()).count();
        if missing > 0 {
            warn!(missing, total = paths.len(), "Some pages have no illustration");
        }
        Ok(paths)
    }
}
