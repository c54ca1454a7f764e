//! Handlers for the `/writers` resource.
//!
//! Deleting a writer also drops it from every movie's writer list (the
//! store cascades the link rows).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_cloud::AssetKind;
use reelbase_core::error::CoreError;
use reelbase_core::types::DbId;
use reelbase_db::models::writer::{CreateWriter, UpdateWriter, Writer};
use reelbase_db::repositories::WriterRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::parse_form;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{NameSearchParams, PaginationParams};
use crate::response::{MessageResponse, PageResponse};
use crate::state::AppState;

const LATEST_LIMIT: i64 = 12;

/// POST /api/v1/writers
///
/// Create a writer (multipart: `name`, optional `avatar`).
pub async fn create_writer(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Writer>)> {
    let form = parse_form(multipart, "avatar").await?;

    let Some(name) = form.text("name") else {
        return Err(AppError::ValidationErrors(vec![
            "Writer name is missing".to_string(),
        ]));
    };

    let (avatar_url, avatar_asset_id) = match form.file {
        Some(file) => {
            let uploaded = state.assets.upload_image(file.data, &file.filename).await?;
            (Some(uploaded.url), Some(uploaded.asset_id))
        }
        None => (None, None),
    };

    let input = CreateWriter {
        name,
        avatar_url,
        avatar_asset_id,
    };
    let writer = WriterRepo::create(&state.pool, &input).await?;

    tracing::info!(
        writer_id = writer.id,
        user_id = admin.user_id,
        "Writer created"
    );

    Ok((StatusCode::CREATED, Json(writer)))
}

/// PATCH /api/v1/writers/{id}
pub async fn update_writer(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(writer_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Writer>> {
    let existing = WriterRepo::find_by_id(&state.pool, writer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Writer",
            id: writer_id,
        }))?;

    let form = parse_form(multipart, "avatar").await?;
    let name = form.text("name");

    let (avatar_url, avatar_asset_id) = match form.file {
        Some(file) => {
            if let Some(old_asset_id) = &existing.avatar_asset_id {
                state.assets.destroy(old_asset_id, AssetKind::Image).await?;
            }
            let uploaded = state.assets.upload_image(file.data, &file.filename).await?;
            (Some(uploaded.url), Some(uploaded.asset_id))
        }
        None => (None, None),
    };

    let input = UpdateWriter {
        name,
        avatar_url,
        avatar_asset_id,
    };
    let writer = WriterRepo::update(&state.pool, writer_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Writer",
            id: writer_id,
        }))?;

    tracing::info!(writer_id, user_id = admin.user_id, "Writer updated");

    Ok(Json(writer))
}

/// DELETE /api/v1/writers/{id}
pub async fn delete_writer(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(writer_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let writer = WriterRepo::find_by_id(&state.pool, writer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Writer",
            id: writer_id,
        }))?;

    if let Some(asset_id) = &writer.avatar_asset_id {
        state.assets.destroy(asset_id, AssetKind::Image).await?;
    }

    WriterRepo::delete(&state.pool, writer_id).await?;

    tracing::info!(writer_id, user_id = admin.user_id, "Writer deleted");

    Ok(Json(MessageResponse::new("Writer deleted successfully")))
}

/// GET /api/v1/writers/search?name=
pub async fn search_writers(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<Json<Vec<Writer>>> {
    if params.name.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid request".into()));
    }
    let result = WriterRepo::search(&state.pool, params.name.trim()).await?;
    Ok(Json(result))
}

/// GET /api/v1/writers/latest
pub async fn latest_writers(State(state): State<AppState>) -> AppResult<Json<Vec<Writer>>> {
    let result = WriterRepo::latest(&state.pool, LATEST_LIMIT).await?;
    Ok(Json(result))
}

/// GET /api/v1/writers/{id}
pub async fn get_writer(
    State(state): State<AppState>,
    Path(writer_id): Path<DbId>,
) -> AppResult<Json<Writer>> {
    let writer = WriterRepo::find_by_id(&state.pool, writer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Writer",
            id: writer_id,
        }))?;
    Ok(Json(writer))
}

/// GET /api/v1/writers?page_no=&limit=
pub async fn list_writers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<Writer>>> {
    let result = WriterRepo::list(&state.pool, params.limit(), params.skip()).await?;
    let count = WriterRepo::count(&state.pool).await?;
    Ok(Json(PageResponse { result, count }))
}
