use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::ai::ImageModel;
use crate::config::{ApiKeySource, Config};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Gemini image model. The API key is resolved and a REST client handle is
/// built on every call; only the connection pool is shared.
pub struct GeminiImageModel {
    client: reqwest::Client,
    api_key: ApiKeySource,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiImageModel {
    pub fn new(api_key: ApiKeySource, model: String, base_url: String) -> Self {
        Self::new_with_client(api_key, model, base_url, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: ApiKeySource,
        model: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
        .with_timeout(config.gemini_timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn http(&self) -> Result<GeminiHttpClient> {
        let api_key = self.api_key.resolve()?;
        Ok(
            GeminiHttpClient::new_with_client(api_key, &self.model, self.client.clone())
                .with_base_url(&self.base_url)
                .with_timeout(self.timeout),
        )
    }
}

#[async_trait]
impl ImageModel for GeminiImageModel {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let http = self.http()?;

        let request = GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        };

        tracing::debug!(
            "Sending {} part(s) to Gemini model {}",
            request.contents[0].parts.len(),
            http.model()
        );

        http.generate_content(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::gemini::InlineData;
    use crate::Error;
    use wiremock::matchers::{body_partial_json, header};
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_model(server: &MockServer, api_key: ApiKeySource) -> GeminiImageModel {
        GeminiImageModel::new(api_key, DEFAULT_MODEL.to_string(), server.uri())
    }

    fn sample_parts() -> Vec<Part> {
        vec![
            Part::inline(InlineData {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            }),
            Part::text("make it blue"),
        ]
    }

    #[tokio::test]
    async fn test_generate_content_parses_inline_data() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": { "mimeType": "image/png", "data": "WFla" }
                        }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = make_model(&server, ApiKeySource::Fixed("key".to_string()));
        let response = model.generate_content(sample_parts()).await.unwrap();

        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        match &parts[0] {
            Part::InlineData { inline_data } => assert_eq!(inline_data.data, "WFla"),
            other => panic!("unexpected part: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_carries_parts_in_order() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "QUJD" } },
                        { "text": "make it blue" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = make_model(&server, ApiKeySource::Fixed("key".to_string()));
        model.generate_content(sample_parts()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_remote_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let model = make_model(&server, ApiKeySource::Fixed("key".to_string()));
        let err = model.generate_content(sample_parts()).await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_serialization_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let model = make_model(&server, ApiKeySource::Fixed("key".to_string()));
        let err = model.generate_content(sample_parts()).await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_api_key_is_resolved_per_call() {
        let server = MockServer::start().await;

        for key in ["first-key", "second-key"] {
            test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
                .and(header("x-goog-api-key", key))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": []
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let model = make_model(&server, ApiKeySource::Env);

        std::env::set_var("GEMINI_API_KEY", "first-key");
        model.generate_content(sample_parts()).await.unwrap();

        std::env::set_var("GEMINI_API_KEY", "second-key");
        model.generate_content(sample_parts()).await.unwrap();
    }
}
