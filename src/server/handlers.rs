use super::input::ImageForm;
use super::AppState;
use crate::Result;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image: String,
}

pub async fn generate_model(
    State(state): State<AppState>,
    mut form: ImageForm,
) -> Result<Json<ImageResponse>> {
    let image = form.take_image("image")?;
    let image = state.studio.generate_model_image(&image).await?;
    Ok(Json(ImageResponse { image }))
}

pub async fn extract_garment(
    State(state): State<AppState>,
    mut form: ImageForm,
) -> Result<Json<ImageResponse>> {
    let image = form.take_image("image")?;
    let image = state.studio.extract_garment_only(&image).await?;
    Ok(Json(ImageResponse { image }))
}

pub async fn virtual_try_on(
    State(state): State<AppState>,
    mut form: ImageForm,
) -> Result<Json<ImageResponse>> {
    let model_image = form.take_image("modelImage")?;
    let garment_image = form.take_image("garmentImage")?;
    let image = state
        .studio
        .generate_virtual_try_on_image(&model_image, &garment_image)
        .await?;
    Ok(Json(ImageResponse { image }))
}

pub async fn pose_variation(
    State(state): State<AppState>,
    mut form: ImageForm,
) -> Result<Json<ImageResponse>> {
    let try_on_image = form.take_image("tryOnImage")?;
    let pose = form.take_text("pose")?;
    let image = state
        .studio
        .generate_pose_variation(&try_on_image, &pose)
        .await?;
    Ok(Json(ImageResponse { image }))
}
