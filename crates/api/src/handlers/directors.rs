//! Handlers for the `/directors` resource.
//!
//! Same shape as actors minus the `about`/`gender` fields. Deleting a
//! director leaves referencing movies with no director rather than touching
//! them.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_cloud::AssetKind;
use reelbase_core::error::CoreError;
use reelbase_core::types::DbId;
use reelbase_db::models::director::{CreateDirector, Director, UpdateDirector};
use reelbase_db::repositories::DirectorRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::parse_form;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{NameSearchParams, PaginationParams};
use crate::response::{MessageResponse, PageResponse};
use crate::state::AppState;

const LATEST_LIMIT: i64 = 12;

/// POST /api/v1/directors
///
/// Create a director (multipart: `name`, optional `avatar`).
pub async fn create_director(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Director>)> {
    let form = parse_form(multipart, "avatar").await?;

    let Some(name) = form.text("name") else {
        return Err(AppError::ValidationErrors(vec![
            "Director name is missing".to_string(),
        ]));
    };

    let (avatar_url, avatar_asset_id) = match form.file {
        Some(file) => {
            let uploaded = state.assets.upload_image(file.data, &file.filename).await?;
            (Some(uploaded.url), Some(uploaded.asset_id))
        }
        None => (None, None),
    };

    let input = CreateDirector {
        name,
        avatar_url,
        avatar_asset_id,
    };
    let director = DirectorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        director_id = director.id,
        user_id = admin.user_id,
        "Director created"
    );

    Ok((StatusCode::CREATED, Json(director)))
}

/// PATCH /api/v1/directors/{id}
pub async fn update_director(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(director_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Director>> {
    let existing = DirectorRepo::find_by_id(&state.pool, director_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Director",
            id: director_id,
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

    let input = UpdateDirector {
        name,
        avatar_url,
        avatar_asset_id,
    };
    let director = DirectorRepo::update(&state.pool, director_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Director",
            id: director_id,
        }))?;

    tracing::info!(director_id, user_id = admin.user_id, "Director updated");

    Ok(Json(director))
}

/// DELETE /api/v1/directors/{id}
pub async fn delete_director(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(director_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let director = DirectorRepo::find_by_id(&state.pool, director_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Director",
            id: director_id,
        }))?;

    if let Some(asset_id) = &director.avatar_asset_id {
        state.assets.destroy(asset_id, AssetKind::Image).await?;
    }

    DirectorRepo::delete(&state.pool, director_id).await?;

    tracing::info!(director_id, user_id = admin.user_id, "Director deleted");

    Ok(Json(MessageResponse::new("Director deleted successfully")))
}

/// GET /api/v1/directors/search?name=
pub async fn search_directors(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<Json<Vec<Director>>> {
    if params.name.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid request".into()));
    }
    let result = DirectorRepo::search(&state.pool, params.name.trim()).await?;
    Ok(Json(result))
}

/// GET /api/v1/directors/latest
pub async fn latest_directors(State(state): State<AppState>) -> AppResult<Json<Vec<Director>>> {
    let result = DirectorRepo::latest(&state.pool, LATEST_LIMIT).await?;
    Ok(Json(result))
}

/// GET /api/v1/directors/{id}
pub async fn get_director(
    State(state): State<AppState>,
    Path(director_id): Path<DbId>,
) -> AppResult<Json<Director>> {
    let director = DirectorRepo::find_by_id(&state.pool, director_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Director",
            id: director_id,
        }))?;
    Ok(Json(director))
}

/// GET /api/v1/directors?page_no=&limit=
pub async fn list_directors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<Director>>> {
    let result = DirectorRepo::list(&state.pool, params.limit(), params.skip()).await?;
    let count = DirectorRepo::count(&state.pool).await?;
    Ok(Json(PageResponse { result, count }))
}
