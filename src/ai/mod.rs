//! Generative model integration
//!
//! Defines the seam between the request orchestrator and the remote image
//! model, with a Gemini REST implementation and an in-memory mock.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiImageModel, GenerateContentResponse, InlineData, Part};
pub use mock::MockImageModel;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Submit one ordered list of parts and return the raw model response.
    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse>;
}
