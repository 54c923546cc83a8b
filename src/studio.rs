//! Request orchestration for the four try-on operations.
//!
//! Each operation decodes its inputs, builds a fixed instruction, makes
//! exactly one model call and extracts the first returned image.

use crate::ai::{ImageModel, Part};
use crate::codec::{extract_image, ImageInput};
use crate::{prompts, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct TryOnStudio {
    model: Arc<dyn ImageModel>,
}

impl TryOnStudio {
    pub fn new(model: Arc<dyn ImageModel>) -> Self {
        Self { model }
    }

    /// Recast a photo of a person as a full-body e-commerce model shot.
    pub async fn generate_model_image(&self, subject: &ImageInput) -> Result<String> {
        let subject = subject.encode()?;
        info!("Generating model image ({})", subject.mime_type);

        self.run(vec![Part::inline(subject), Part::text(prompts::GENERATE_MODEL)])
            .await
    }

    /// Isolate the main garment of an image on a plain background.
    pub async fn extract_garment_only(&self, garment: &ImageInput) -> Result<String> {
        let garment = garment.encode()?;
        info!("Extracting garment ({})", garment.mime_type);

        self.run(vec![Part::inline(garment), Part::text(prompts::EXTRACT_GARMENT)])
            .await
    }

    /// Dress the model in the garment, keeping face, pose and background.
    pub async fn generate_virtual_try_on_image(
        &self,
        model_image: &ImageInput,
        garment: &ImageInput,
    ) -> Result<String> {
        let model_image = model_image.encode()?;
        let garment = garment.encode()?;
        info!(
            "Generating virtual try-on (model {}, garment {})",
            model_image.mime_type, garment.mime_type
        );

        self.run(vec![
            Part::inline(model_image),
            Part::inline(garment),
            Part::text(prompts::VIRTUAL_TRY_ON),
        ])
        .await
    }

    /// Regenerate a try-on result in a new pose described in free text.
    ///
    /// The pose text is interpolated as-is; it is only ever sent to the model.
    pub async fn generate_pose_variation(
        &self,
        try_on_image: &ImageInput,
        pose: &str,
    ) -> Result<String> {
        let try_on_image = try_on_image.encode()?;
        info!("Generating pose variation ({} chars of pose text)", pose.chars().count());
        debug!("Requested pose: {}", pose);

        let instruction = prompts::render(prompts::POSE_VARIATION, &[("pose", pose)]);
        self.run(vec![Part::inline(try_on_image), Part::text(instruction)])
            .await
    }

    async fn run(&self, parts: Vec<Part>) -> Result<String> {
        let response = self.model.generate_content(parts).await?;
        extract_image(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{InlineData, MockImageModel};
    use crate::Error;

    const MODEL_URL: &str = "data:image/png;base64,TU9ERUw=";
    const GARMENT_URL: &str = "data:image/jpeg;base64,R0FSTUVOVA==";

    fn studio(mock: &MockImageModel) -> TryOnStudio {
        TryOnStudio::new(Arc::new(mock.clone()))
    }

    fn inline_of(part: &Part) -> &InlineData {
        match part {
            Part::InlineData { inline_data } => inline_data,
            other => panic!("expected inline data, got {:?}", other),
        }
    }

    fn text_of(part: &Part) -> &str {
        match part {
            Part::Text { text } => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_model_image_sends_image_then_prompt() {
        let mock = MockImageModel::new().with_image_response("image/png", "T1VU");

        let result = studio(&mock)
            .generate_model_image(&MODEL_URL.into())
            .await
            .unwrap();
        assert_eq!(result, "data:image/png;base64,T1VU");

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
        assert_eq!(inline_of(&requests[0][0]).data, "TU9ERUw=");
        assert_eq!(text_of(&requests[0][1]), prompts::GENERATE_MODEL);
    }

    #[tokio::test]
    async fn test_extract_garment_uses_garment_prompt() {
        let mock = MockImageModel::new();

        studio(&mock)
            .extract_garment_only(&GARMENT_URL.into())
            .await
            .unwrap();

        let requests = mock.get_requests();
        assert_eq!(inline_of(&requests[0][0]).mime_type, "image/jpeg");
        assert_eq!(text_of(&requests[0][1]), prompts::EXTRACT_GARMENT);
    }

    #[tokio::test]
    async fn test_virtual_try_on_orders_model_garment_prompt() {
        let mock = MockImageModel::new();

        studio(&mock)
            .generate_virtual_try_on_image(&MODEL_URL.into(), &GARMENT_URL.into())
            .await
            .unwrap();

        let parts = &mock.get_requests()[0];
        assert_eq!(parts.len(), 3);
        assert_eq!(inline_of(&parts[0]).data, "TU9ERUw=");
        assert_eq!(inline_of(&parts[1]).data, "R0FSTUVOVA==");
        assert_eq!(text_of(&parts[2]), prompts::VIRTUAL_TRY_ON);
    }

    #[tokio::test]
    async fn test_pose_variation_interpolates_pose() {
        let mock = MockImageModel::new();

        studio(&mock)
            .generate_pose_variation(&MODEL_URL.into(), "arms crossed")
            .await
            .unwrap();

        let parts = &mock.get_requests()[0];
        let instruction = text_of(&parts[1]);
        assert!(instruction.contains("\"arms crossed\""));
        assert!(!instruction.contains("{{pose}}"));
    }

    #[tokio::test]
    async fn test_malformed_input_never_reaches_model() {
        let mock = MockImageModel::new();

        let err = studio(&mock)
            .generate_virtual_try_on_image(&MODEL_URL.into(), &"not-a-data-url".into())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MalformedInput(_)));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_text_only_response_becomes_no_image_error() {
        let mock = MockImageModel::new().with_text_response("blocked by safety filter");

        let err = studio(&mock)
            .extract_garment_only(&GARMENT_URL.into())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoImageProduced { .. }));
        assert!(err.to_string().contains("blocked by safety filter"));
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let mock = MockImageModel::new().with_failure("upstream unavailable");

        let err = studio(&mock)
            .generate_model_image(&MODEL_URL.into())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote { .. }));
    }
}
