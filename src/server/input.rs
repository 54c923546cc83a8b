//! Request body extraction shared by every route.
//!
//! Routes accept either a JSON object of strings or a multipart form using
//! the same field names. File parts become binary image inputs; everything
//! else is kept as text.

use crate::codec::ImageInput;
use crate::{Error, Result};
use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use std::collections::HashMap;

#[derive(Debug)]
enum FormValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct ImageForm {
    fields: HashMap<String, FormValue>,
}

impl ImageForm {
    /// Take an image field; text values are treated as data URLs.
    pub fn take_image(&mut self, name: &str) -> Result<ImageInput> {
        match self.fields.remove(name) {
            Some(FormValue::Text(url)) => Ok(ImageInput::DataUrl(url)),
            Some(FormValue::File {
                bytes,
                content_type,
            }) => Ok(ImageInput::Binary {
                bytes,
                content_type,
            }),
            None => Err(missing_field(name)),
        }
    }

    pub fn take_text(&mut self, name: &str) -> Result<String> {
        match self.fields.remove(name) {
            Some(FormValue::Text(text)) => Ok(text),
            Some(FormValue::File { .. }) => Err(Error::InvalidRequest(format!(
                "Field '{}' must be text, not a file",
                name
            ))),
            None => Err(missing_field(name)),
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Error::InvalidRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let value = if field.file_name().is_some() {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidRequest(e.to_string()))?;
                FormValue::File {
                    bytes: bytes.to_vec(),
                    content_type,
                }
            } else {
                FormValue::Text(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::InvalidRequest(e.to_string()))?,
                )
            };

            form.fields.insert(name, value);
        }

        Ok(form)
    }

    fn from_json(body: HashMap<String, serde_json::Value>) -> Self {
        let fields = body
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(text) => Some((name, FormValue::Text(text))),
                _ => None,
            })
            .collect();

        Self { fields }
    }
}

fn missing_field(name: &str) -> Error {
    Error::InvalidRequest(format!("Missing field '{}'", name))
}

#[async_trait]
impl<S> FromRequest<S> for ImageForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| Error::InvalidRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(body) = Json::<HashMap<String, serde_json::Value>>::from_request(req, state)
                .await
                .map_err(|e| Error::InvalidRequest(e.body_text()))?;
            Ok(Self::from_json(body))
        }
    }
}
