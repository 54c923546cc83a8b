//! Image codec adapter
//!
//! Normalizes incoming images (data-URL strings or raw uploads) into the
//! `{mimeType, data}` parts the model expects, and turns a model response
//! back into a data URL.

use crate::ai::mime::detect_image_mime;
use crate::ai::{GenerateContentResponse, InlineData, Part};
use crate::{Error, Result};
use base64::Engine as _;
use regex::Regex;
use std::sync::OnceLock;

/// An image as it arrives at the service boundary.
#[derive(Debug, Clone)]
pub enum ImageInput {
    DataUrl(String),
    Binary {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
}

impl ImageInput {
    pub fn encode(&self) -> Result<InlineData> {
        match self {
            ImageInput::DataUrl(url) => decode(url),
            ImageInput::Binary {
                bytes,
                content_type,
            } => decode_from_binary(bytes, content_type.as_deref()),
        }
    }
}

impl From<&str> for ImageInput {
    fn from(url: &str) -> Self {
        ImageInput::DataUrl(url.to_string())
    }
}

impl From<String> for ImageInput {
    fn from(url: String) -> Self {
        ImageInput::DataUrl(url)
    }
}

fn mime_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":(.*?);").expect("MIME pattern is a valid regex"))
}

/// Split a `data:<mime>;base64,<payload>` string into its MIME type and payload.
///
/// The payload is returned untouched; base64 validity is left to the model API.
pub fn decode(data_url: &str) -> Result<InlineData> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| Error::MalformedInput("missing ',' separator".to_string()))?;

    let mime_type = mime_pattern()
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|mime| !mime.is_empty())
        .ok_or_else(|| {
            Error::MalformedInput("could not parse MIME type from header".to_string())
        })?;

    Ok(InlineData {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

/// Encode raw upload bytes, trusting the declared content type when it is specific.
pub fn decode_from_binary(bytes: &[u8], declared_content_type: Option<&str>) -> Result<InlineData> {
    let mime_type = declared_content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .unwrap_or_else(|| detect_image_mime(bytes));

    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    decode(&format_data_url(mime_type, &data))
}

pub fn format_data_url(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}

/// Return the first inline image of the response as a data URL.
///
/// Candidates, then their parts, are walked in order and the first image wins.
pub fn extract_image(response: &GenerateContentResponse) -> Result<String> {
    let image = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| match part {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        });

    match image {
        Some(inline) => {
            tracing::debug!("Model returned image with mime_type: {}", inline.mime_type);
            Ok(format_data_url(&inline.mime_type, &inline.data))
        }
        None => {
            let advisory = response.advisory();
            tracing::warn!("Model response contained no image (advisory: {:?})", advisory);
            Err(Error::NoImageProduced { advisory })
        }
    }
}
