//! Handlers for the `/actors` resource.
//!
//! Mutations are admin-only and arrive as multipart forms (fields plus an
//! optional `avatar` image). An avatar replacement destroys the old asset
//! only after the new file has been received.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_cloud::AssetKind;
use reelbase_core::error::CoreError;
use reelbase_core::types::DbId;
use reelbase_db::models::actor::{Actor, CreateActor, UpdateActor};
use reelbase_db::repositories::ActorRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::parse_form;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{NameSearchParams, PaginationParams};
use crate::response::{MessageResponse, PageResponse};
use crate::state::AppState;

/// Number of entries returned by the latest-uploads listing.
const LATEST_LIMIT: i64 = 12;

/// Accepted gender values.
const GENDERS: &[&str] = &["male", "female"];

/// POST /api/v1/actors
///
/// Create an actor (multipart: `name`, `about`, `gender`, optional `avatar`).
pub async fn create_actor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Actor>)> {
    let form = parse_form(multipart, "avatar").await?;

    let mut errors = Vec::new();
    let name = form.text("name");
    let about = form.text("about");
    let gender = form.text("gender");

    if name.is_none() {
        errors.push("Actor name is missing".to_string());
    }
    if about.is_none() {
        errors.push("About is a required field".to_string());
    }
    match &gender {
        None => errors.push("Gender is a required field".to_string()),
        Some(g) if !GENDERS.contains(&g.as_str()) => {
            errors.push("Gender must be 'male' or 'female'".to_string());
        }
        Some(_) => {}
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    // The validation pass above guarantees all three are present.
    let (Some(name), Some(about), Some(gender)) = (name, about, gender) else {
        return Err(AppError::InternalError(
            "Actor form validation let a missing field through".to_string(),
        ));
    };

    let (avatar_url, avatar_asset_id) = match form.file {
        Some(file) => {
            let uploaded = state.assets.upload_image(file.data, &file.filename).await?;
            (Some(uploaded.url), Some(uploaded.asset_id))
        }
        None => (None, None),
    };

    let input = CreateActor {
        name,
        about,
        gender,
        avatar_url,
        avatar_asset_id,
    };
    let actor = ActorRepo::create(&state.pool, &input).await?;

    tracing::info!(actor_id = actor.id, user_id = admin.user_id, "Actor created");

    Ok((StatusCode::CREATED, Json(actor)))
}

/// PATCH /api/v1/actors/{id}
///
/// Update an actor. Absent fields keep their stored value; a new avatar
/// replaces (and destroys) the old one.
pub async fn update_actor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(actor_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Actor>> {
    let existing = ActorRepo::find_by_id(&state.pool, actor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id: actor_id,
        }))?;

    let form = parse_form(multipart, "avatar").await?;

    let name = form.text("name");
    let about = form.text("about");
    let gender = form.text("gender");
    if let Some(gender) = &gender {
        if !GENDERS.contains(&gender.as_str()) {
            return Err(AppError::ValidationErrors(vec![
                "Gender must be 'male' or 'female'".to_string(),
            ]));
        }
    }

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

    let input = UpdateActor {
        name,
        about,
        gender,
        avatar_url,
        avatar_asset_id,
    };
    let actor = ActorRepo::update(&state.pool, actor_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id: actor_id,
        }))?;

    tracing::info!(actor_id, user_id = admin.user_id, "Actor updated");

    Ok(Json(actor))
}

/// DELETE /api/v1/actors/{id}
///
/// Destroy the avatar asset (when present) and delete the actor. Cast
/// entries referencing the actor are removed by the store.
pub async fn delete_actor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(actor_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let actor = ActorRepo::find_by_id(&state.pool, actor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id: actor_id,
        }))?;

    if let Some(asset_id) = &actor.avatar_asset_id {
        state.assets.destroy(asset_id, AssetKind::Image).await?;
    }

    ActorRepo::delete(&state.pool, actor_id).await?;

    tracing::info!(actor_id, user_id = admin.user_id, "Actor deleted");

    Ok(Json(MessageResponse::new("Actor deleted successfully")))
}

/// GET /api/v1/actors/search?name=
pub async fn search_actors(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<Json<Vec<Actor>>> {
    if params.name.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid request".into()));
    }
    let result = ActorRepo::search(&state.pool, params.name.trim()).await?;
    Ok(Json(result))
}

/// GET /api/v1/actors/latest
pub async fn latest_actors(State(state): State<AppState>) -> AppResult<Json<Vec<Actor>>> {
    let result = ActorRepo::latest(&state.pool, LATEST_LIMIT).await?;
    Ok(Json(result))
}

/// GET /api/v1/actors/{id}
pub async fn get_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<DbId>,
) -> AppResult<Json<Actor>> {
    let actor = ActorRepo::find_by_id(&state.pool, actor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id: actor_id,
        }))?;
    Ok(Json(actor))
}

/// GET /api/v1/actors?page_no=&limit=
///
/// Paginated listing for the admin dashboard, newest first.
pub async fn list_actors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<Actor>>> {
    let result = ActorRepo::list(&state.pool, params.limit(), params.skip()).await?;
    let count = ActorRepo::count(&state.pool).await?;
    Ok(Json(PageResponse { result, count }))
}
