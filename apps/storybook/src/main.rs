mod config;
mod errors;
mod gemini;
mod illustration;
mod input;
mod layout;
mod models;
mod pipeline;
mod story;

use std::process::ExitCode;
use std::sync::Arc;

use console::style;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::illustration::ImageClient;
use crate::pipeline::Pipeline;
use crate::story::StoryClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration first; nothing runs without a credential
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e:#}", style("Configuration error:").red().bold());
            return ExitCode::FAILURE;
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storybook v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = tokio::fs::create_dir_all(&config.output_dir).await {
        error!("Cannot create output directory {}: {e}", config.output_dir.display());
        return ExitCode::FAILURE;
    }

    let request = match input::collect_request() {
        Ok(request) => request,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // One Gemini client, credential injected once, shared by both stages
    let gemini = GeminiClient::new(config.gemini_api_key.clone());
    let pipeline = Pipeline::new(
        Arc::new(StoryClient::new(gemini.clone())),
        Arc::new(ImageClient::new(gemini, config.output_dir.clone())),
        config.output_dir.clone(),
        config.layout_options(),
    );

    match pipeline.run(&request).await {
        Ok(report) if report.rendered => {
            println!(
                "{} {} ({} pages, {} illustrated)",
                style("Storybook saved to").green().bold(),
                report.output.display(),
                report.pages,
                report.illustrations
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            println!(
                "{} {}",
                style("Failed to create storybook:").red().bold(),
                report.output.display()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(stage = e.stage(), "{e}");
            println!("{} {e}", style("Stopped:").red().bold());
            ExitCode::FAILURE
        }
    }
}
