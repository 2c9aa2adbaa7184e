pub mod request;
pub mod story;

pub use request::StoryRequest;
pub use story::StoryText;
