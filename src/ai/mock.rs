use super::gemini::{Candidate, Content, GenerateContentResponse, InlineData, Part};
use super::ImageModel;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// 1x1 transparent PNG, base64-encoded.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Scripted in-memory model used by tests and local harnesses.
///
/// Responses are replayed in order and cycle once exhausted. Every request's
/// parts are recorded for later inspection.
#[derive(Clone)]
pub struct MockImageModel {
    responses: Arc<Mutex<Vec<GenerateContentResponse>>>,
    failure: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<Vec<Part>>>>,
}

impl MockImageModel {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: GenerateContentResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Queue a response holding a single inline image part.
    pub fn with_image_response(self, mime_type: &str, data: &str) -> Self {
        self.with_response(response_with_parts(vec![Part::inline(InlineData {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })]))
    }

    /// Queue a response holding only advisory text.
    pub fn with_text_response(self, text: &str) -> Self {
        self.with_response(response_with_parts(vec![Part::text(text)]))
    }

    /// Make every call fail with a remote error carrying `message`.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<Vec<Part>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self::new()
    }
}

pub fn response_with_parts(parts: Vec<Part>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".to_string()),
                parts,
            }),
            finish_reason: Some("STOP".to_string()),
        }],
        prompt_feedback: None,
    }
}

#[async_trait]
impl ImageModel for MockImageModel {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let call_index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(parts);
            requests.len() - 1
        };

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Remote {
                status: 500,
                message,
            });
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(response_with_parts(vec![Part::inline(InlineData {
                mime_type: "image/png".to_string(),
                data: TINY_PNG_BASE64.to_string(),
            })]))
        } else {
            Ok(responses[call_index % responses.len()].clone())
        }
    }
}
