//! Pipeline Orchestrator: story, cover, illustrations, then layout.
//!
//! Linear and fail-fast: each generation stage runs exactly once and any error
//! ends the run. Rendering reports through `PipelineReport::rendered` instead.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::gemini::GeminiError;
use crate::illustration::ImageClient;
use crate::layout::{self, LayoutOptions, RenderJob};
use crate::models::request::output_filename;
use crate::models::{StoryRequest, StoryText};
use crate::story::prompts::{build_story_prompt, IllustrationBrief};
use crate::story::StoryClient;

// ────────────────────────────────────────────────────────────────────────────
// Seams
// ────────────────────────────────────────────────────────────────────────────

/// Produces the page-delimited story text for a prompt.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    async fn write_story(&self, prompt: &str) -> Result<StoryText, GeminiError>;
}

/// Produces the cover pattern and the per-page artwork.
#[async_trait]
pub trait Illustrator: Send + Sync {
    async fn cover(&self, theme: &str) -> Result<Option<PathBuf>, GeminiError>;

    async fn illustrate(
        &self,
        story: &StoryText,
        brief: &IllustrationBrief,
    ) -> Result<Vec<Option<PathBuf>>, GeminiError>;
}

#[async_trait]
impl StoryWriter for StoryClient {
    async fn write_story(&self, prompt: &str) -> Result<StoryText, GeminiError> {
        self.generate_story(prompt).await
    }
}

#[async_trait]
impl Illustrator for ImageClient {
    async fn cover(&self, theme: &str) -> Result<Option<PathBuf>, GeminiError> {
        self.generate_cover(theme).await
    }

    async fn illustrate(
        &self,
        story: &StoryText,
        brief: &IllustrationBrief,
    ) -> Result<Vec<Option<PathBuf>>, GeminiError> {
        self.generate_illustrations(story, brief).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub rendered: bool,
    /// Story segments in the text.
    pub pages: usize,
    /// Segments that received artwork.
    pub illustrations: usize,
}

pub struct Pipeline {
    writer: Arc<dyn StoryWriter>,
    illustrator: Arc<dyn Illustrator>,
    output_dir: PathBuf,
    layout: LayoutOptions,
}

impl Pipeline {
    pub fn new(
        writer: Arc<dyn StoryWriter>,
        illustrator: Arc<dyn Illustrator>,
        output_dir: PathBuf,
        layout: LayoutOptions,
    ) -> Self {
        Self {
            writer,
            illustrator,
            output_dir,
            layout,
        }
    }

    pub async fn run(&self, request: &StoryRequest) -> Result<PipelineReport, AppError> {
        println!("Writing the story...");
        let prompt = build_story_prompt(request);
        let story = self
            .writer
            .write_story(&prompt)
            .await
            .map_err(AppError::Story)?;
        let pages = story.pages().len();
        info!("Story ready: {} pages", pages);

        println!("Painting the cover pattern...");
        let cover_image = self
            .illustrator
            .cover(&request.cover_theme)
            .await
            .map_err(AppError::Cover)?;
        if cover_image.is_none() {
            warn!("No cover pattern, covers will use the theme color");
        }

        println!("Illustrating {} pages...", pages);
        let brief = IllustrationBrief::from_request(request);
        let illustrations = self
            .illustrator
            .illustrate(&story, &brief)
            .await
            .map_err(AppError::Illustrations)?;
        let illustrated = illustrations.iter().filter(|p| p.is_some()).count();

        println!("Laying out the book...");
        let output = self.output_dir.join(output_filename(&request.protagonist));
        let job = RenderJob {
            title: request.title.clone(),
            story,
            illustrations,
            end_message: request.end_message.clone(),
            cover_image,
            theme_color: request.theme_color.clone(),
            output: output.clone(),
        };
        let options = self.layout.clone();
        let rendered = tokio::task::spawn_blocking(move || layout::render(&job, &options)).await?;

        Ok(PipelineReport {
            output,
            rendered,
            pages,
            illustrations: illustrated,
        })
    }
}
