pub mod client;
pub mod image;
pub mod types;

pub use client::GeminiHttpClient;
pub use image::GeminiImageModel;
pub use types::{Candidate, Content, GenerateContentResponse, InlineData, Part, PromptFeedback};
