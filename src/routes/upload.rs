use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::upload::UploadResponse,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
    storage::sanitize_filename,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_image))
}

#[derive(ToSchema)]
#[allow(unused)]
struct UploadForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    file: String,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Public URL of the stored image", body = ApiResponse<UploadResponse>),
        (status = 400, description = "No file uploaded"),
        (status = 500, description = "Object storage unavailable"),
    ),
    tag = "Upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let storage = match &state.storage {
        Some(storage) => storage,
        None => {
            return Err(AppError::Storage(
                "object storage is not configured".into(),
            ));
        }
    };

    // First file field wins, matching the dashboard's single-file form.
    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        upload = Some((filename, content_type, data.to_vec()));
        break;
    }

    let Some((filename, content_type, bytes)) = upload.filter(|(_, _, b)| !b.is_empty()) else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    let key = format!("products/{}-{}", Uuid::new_v4(), filename);
    storage.put_object(&key, &content_type, bytes).await?;
    let url = storage.public_url(&key);

    Ok(Json(ApiResponse::success(
        "Uploaded",
        UploadResponse { url },
        Some(Meta::empty()),
    )))
}
