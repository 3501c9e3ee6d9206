use axum::{extract::State, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{SignatureRequest, UploadSignature};
use super::services::{build_upload_params, folder_for, sign_params};

pub fn routes() -> Router<AppState> {
    Router::new().route("/cloudinary/signature", post(signature))
}

/// Exchange a (possibly empty) parameter set for a one-shot upload
/// authorization. Missing host credentials are reported here, before any
/// signing is attempted, not discovered mid-upload.
#[instrument(skip(state, body))]
pub async fn signature(
    State(state): State<AppState>,
    body: Option<Json<SignatureRequest>>,
) -> Result<Json<UploadSignature>, ApiError> {
    let Some(config) = state.config.cloudinary.as_ref() else {
        warn!("cloudinary credentials not configured");
        return Err(ApiError::Config(
            "Cloudinary environment variables are not fully configured on the server.".into(),
        ));
    };

    let request = body.map(|Json(b)| b).unwrap_or_default();
    let timestamp = OffsetDateTime::now_utc().unix_timestamp();

    let params = build_upload_params(&request, &config.upload_folder, timestamp);
    let signature = sign_params(&params, &config.api_secret);

    Ok(Json(UploadSignature {
        timestamp,
        signature,
        api_key: config.api_key.clone(),
        cloud_name: config.cloud_name.clone(),
        folder: folder_for(&request, config),
    }))
}
