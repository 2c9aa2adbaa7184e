// Cover pattern and per-page illustrations.
// Consistency across pages comes from the explicit IllustrationSession transcript.

pub mod assets;
pub mod client;
pub mod session;

pub use client::ImageClient;
pub use session::IllustrationSession;
