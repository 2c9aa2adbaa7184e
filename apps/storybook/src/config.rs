use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::layout::{LayoutOptions, MissingArtwork};

/// Application configuration loaded from environment variables.
/// `main` exits with status 1 if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub output_dir: PathBuf,
    pub organic_edges: bool,
    pub missing_artwork: MissingArtwork,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let missing_artwork = match lookup("STORYBOOK_MISSING_ARTWORK") {
            Some(value) => parse_missing_artwork(&value)?,
            None => MissingArtwork::default(),
        };

        Ok(Config {
            gemini_api_key: require_env(&lookup, "GEMINI_API_KEY")?,
            output_dir: lookup("STORYBOOK_OUTPUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            organic_edges: lookup("STORYBOOK_ORGANIC_EDGES")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            missing_artwork,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            organic_edges: self.organic_edges,
            missing_artwork: self.missing_artwork,
        }
    }
}

fn require_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| {
            format!(
                "Required environment variable '{key}' is not set \
                 (add it to .env in the working directory)"
            )
        })
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_missing_artwork(value: &str) -> Result<MissingArtwork> {
    match value.trim().to_ascii_lowercase().as_str() {
        "blank" => Ok(MissingArtwork::Blank),
        "gray" | "grey" => Ok(MissingArtwork::GrayBox),
        other => bail!("STORYBOOK_MISSING_ARTWORK must be 'blank' or 'gray', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = config_from(&[("GEMINI_API_KEY", "abc")]).unwrap();
        assert_eq!(config.gemini_api_key, "abc");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.organic_edges);
        assert_eq!(config.missing_artwork, MissingArtwork::Blank);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(config_from(&[("GEMINI_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_flags_and_policy_parse() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("STORYBOOK_ORGANIC_EDGES", "Yes"),
            ("STORYBOOK_MISSING_ARTWORK", "gray"),
            ("STORYBOOK_OUTPUT_DIR", "/tmp/books"),
        ])
        .unwrap();
        assert!(config.organic_edges);
        assert_eq!(config.missing_artwork, MissingArtwork::GrayBox);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/books"));
        assert!(config.layout_options().organic_edges);
    }

    #[test]
    fn test_invalid_missing_artwork_is_rejected() {
        let result = config_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("STORYBOOK_MISSING_ARTWORK", "sparkles"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flag_off_values() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }
}
