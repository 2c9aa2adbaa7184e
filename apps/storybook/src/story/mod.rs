// Story drafting: prompt templates plus the text-generation client.
// All service calls go through crate::gemini, never direct HTTP.

pub mod client;
pub mod prompts;

pub use client::StoryClient;
