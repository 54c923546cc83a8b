//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror.

use thiserror::Error;

const UNSUPPORTED_MIME_MARKER: &str = "Unsupported MIME type";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The supplied image string is not a parseable data URL.
    #[error("Invalid data URL: {0}")]
    MalformedInput(String),

    /// The model answered but no part carried inline image data.
    #[error("{}", describe_missing_image(.advisory.as_deref()))]
    NoImageProduced { advisory: Option<String> },

    #[error("Gemini API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_missing_image(advisory: Option<&str>) -> String {
    match advisory {
        Some(text) => format!("The model did not return an image. Response: \"{}\"", text),
        None => "The model did not return an image. This can happen because of safety filters \
                 or when the request is too complex."
            .to_string(),
    }
}

impl Error {
    /// Message suitable for end users.
    ///
    /// A remote rejection of the uploaded media type is rewritten into a short
    /// hint naming the format; everything else, model advisories included, is
    /// passed through unchanged.
    pub fn client_message(&self) -> String {
        let message = match self {
            Error::Remote { message, .. } if message.contains(UNSUPPORTED_MIME_MARKER) => message,
            _ => return self.to_string(),
        };

        match unsupported_mime_type(message) {
            Some(mime) => format!(
                "The file type '{}' is not supported. Please use a format such as PNG, JPEG or WEBP.",
                mime
            ),
            None => "Unsupported file format. Please upload a PNG, JPEG or WEBP image.".to_string(),
        }
    }
}

fn unsupported_mime_type(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once(UNSUPPORTED_MIME_MARKER)?;
    let rest = rest.strip_prefix(':')?.trim_start();
    rest.split(|c: char| c.is_whitespace() || matches!(c, '"' | ',' | '\''))
        .next()
        .filter(|mime| !mime.is_empty())
}
