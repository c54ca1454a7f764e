//! HTTP-level integration tests for reviews: the one-review-per-movie rule,
//! ownership checks, and the rating aggregate exposed on movie detail.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    body_json, create_test_user, delete_auth, get, patch_json_auth, post_json_auth, token_for,
};
use reelbase_core::types::DbId;
use reelbase_db::models::movie::{CreateMovie, PosterAsset};
use reelbase_db::repositories::MovieRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_movie(pool: &PgPool, title: &str) -> DbId {
    let input = CreateMovie {
        title: title.to_string(),
        story_line: "A story".to_string(),
        director_id: None,
        release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
        status: "public".to_string(),
        kind: "Film".to_string(),
        language: "English".to_string(),
        genres: vec!["action".to_string()],
        tags: vec!["matrix".to_string(), "cyberpunk".to_string(), "future".to_string()],
        poster: PosterAsset {
            url: format!("https://assets.test/{title}.jpg"),
            asset_id: format!("poster-{title}"),
            responsive: vec![],
        },
        trailer_url: format!("https://assets.test/{title}.mp4"),
        trailer_asset_id: format!("trailer-{title}"),
        cast: vec![],
        writer_ids: vec![],
    };
    MovieRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Creation and the duplicate rule
// ---------------------------------------------------------------------------

/// A review is created with 201; a second one on the same movie by the same
/// caller conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_one_review_per_user_per_movie(pool: PgPool) {
    let (user, _pw) = create_test_user(&pool, "alice@test.com", "user").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;
    let token = token_for(&user);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 8, "content": "Great" });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 9, "content": "Even better" });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "You have already reviewed this movie");
}

/// Ratings outside 1..=10 are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_rating_range_validated(pool: PgPool) {
    let (user, _pw) = create_test_user(&pool, "alice@test.com", "user").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 11 });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Reviewing a missing movie is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_missing_movie(pool: PgPool) {
    let (user, _pw) = create_test_user(&pool, "alice@test.com", "user").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "movie_id": 4242, "rating": 8 });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

/// A non-owner, non-admin caller gets 401 (not 404) on update and delete.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_owner_is_unauthorized(pool: PgPool) {
    let (owner, _pw) = create_test_user(&pool, "owner@test.com", "user").await;
    let (other, _pw) = create_test_user(&pool, "other@test.com", "user").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 8 });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token_for(&owner)).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "rating": 1 });
    let response = patch_json_auth(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        body,
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The owner can update; an admin can delete someone else's review but not
/// update it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_updates_admin_deletes(pool: PgPool) {
    let (owner, _pw) = create_test_user(&pool, "owner@test.com", "user").await;
    let (admin, _pw) = create_test_user(&pool, "admin@test.com", "admin").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 8 });
    let response = post_json_auth(app, "/api/v1/reviews", body, &token_for(&owner)).await;
    let review_id = body_json(response).await["id"].as_i64().unwrap();

    // Owner update succeeds.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "rating": 9 });
    let response = patch_json_auth(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        body,
        &token_for(&owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 9);

    // Admin update of someone else's review is still unauthorized.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "rating": 1 });
    let response = patch_json_auth(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        body,
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin delete succeeds.
    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reviews_count"], 0);
}

// ---------------------------------------------------------------------------
// Aggregate on movie detail
// ---------------------------------------------------------------------------

/// A movie with no reviews exposes an empty `reviews` object, not zeros.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_movie_detail_empty_aggregate(pool: PgPool) {
    let movie_id = seed_movie(&pool, "Quiet").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies/{movie_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["reviews"],
        serde_json::json!({}),
        "no reviews means an empty object, not {{\"rating_average\": 0}}"
    );
}

/// Ratings [8, 10] show up as `{"rating_average": "9.0", "review_count": 2}`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_movie_detail_aggregate(pool: PgPool) {
    let (alice, _pw) = create_test_user(&pool, "alice@test.com", "user").await;
    let (bob, _pw) = create_test_user(&pool, "bob@test.com", "user").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;

    for (user, rating) in [(&alice, 8), (&bob, 10)] {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "movie_id": movie_id, "rating": rating });
        let response = post_json_auth(app, "/api/v1/reviews", body, &token_for(user)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies/{movie_id}")).await;
    let json = body_json(response).await;

    assert_eq!(json["reviews"]["rating_average"], "9.0");
    assert_eq!(json["reviews"]["review_count"], 2);
}

/// The per-movie review listing carries each owner's public identity.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reviews_for_movie_listing(pool: PgPool) {
    let (alice, _pw) = create_test_user(&pool, "alice@test.com", "user").await;
    let movie_id = seed_movie(&pool, "The Matrix").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "movie_id": movie_id, "rating": 8, "content": "Whoa" });
    post_json_auth(app, "/api/v1/reviews", body, &token_for(&alice)).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies/{movie_id}/reviews")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let reviews = json.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["owner_name"], "alice");
    assert_eq!(reviews[0]["content"], "Whoa");
}
