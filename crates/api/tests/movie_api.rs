//! HTTP-level integration tests for the movies resource: admin gating,
//! multipart creation, listings, and asset cleanup on delete.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    body_json, create_test_user, delete_auth, get, get_auth, multipart_body, post_multipart_auth,
    token_for,
};
use reelbase_cloud::AssetStore;
use reelbase_core::types::DbId;
use reelbase_db::models::movie::{CreateMovie, PosterAsset};
use reelbase_db::repositories::MovieRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn movie_input(title: &str, tags: &[&str], status: &str) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        story_line: "A story".to_string(),
        director_id: None,
        release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
        status: status.to_string(),
        kind: "Film".to_string(),
        language: "English".to_string(),
        genres: vec!["action".to_string()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        poster: PosterAsset {
            url: format!("https://assets.test/{title}.jpg"),
            asset_id: format!("poster-{title}"),
            responsive: vec![],
        },
        trailer_url: format!("https://assets.test/{title}.mp4"),
        trailer_asset_id: format!("trailer-{title}"),
        cast: vec![],
        writer_ids: vec![],
    }
}

async fn seed_movie(pool: &PgPool, title: &str, tags: &[&str], status: &str) -> DbId {
    MovieRepo::create(pool, &movie_input(title, tags, status))
        .await
        .unwrap()
        .id
}

fn create_movie_parts<'a>(title: &'a str, trailer: &'a str) -> Vec<(&'a str, String)> {
    vec![
        ("title", title.to_string()),
        ("story_line", "A hacker discovers reality".to_string()),
        ("release_date", "1999-03-31".to_string()),
        ("status", "public".to_string()),
        ("type", "Film".to_string()),
        ("language", "English".to_string()),
        ("genres", r#"["action","sci-fi"]"#.to_string()),
        ("tags", r#"["matrix","cyberpunk"]"#.to_string()),
        ("trailer", trailer.to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Admin gating
// ---------------------------------------------------------------------------

/// Catalog mutation requires the admin role; a plain user gets 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_requires_admin(pool: PgPool) {
    let (user, _pw) = create_test_user(&pool, "user@test.com", "user").await;

    let app = common::build_test_app(pool);
    let (content_type, body) = multipart_body(&[("title", "Nope")], None);
    let response = post_multipart_auth(
        app,
        "/api/v1/movies",
        content_type,
        body,
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The admin listing is gated too.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_listing_gated(pool: PgPool) {
    let (user, _pw) = create_test_user(&pool, "user@test.com", "user").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/movies", &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Full multipart creation: trailer upload first, then the movie with a
/// poster file. The poster lands in the asset store.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_movie_multipart(pool: PgPool) {
    let (admin, _pw) = create_test_user(&pool, "admin@test.com", "admin").await;
    let token = token_for(&admin);

    // 1. Upload the trailer.
    let (app, assets) = common::build_test_app_with_assets(pool.clone());
    let (content_type, body) =
        multipart_body(&[], Some(("video", "trailer.mp4", b"video-bytes")));
    let response =
        post_multipart_auth(app, "/api/v1/movies/upload-trailer", content_type, body, &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let trailer = body_json(response).await;
    assert!(assets.contains(trailer["asset_id"].as_str().unwrap()));

    // 2. Create the movie referencing it.
    let trailer_json = serde_json::json!({
        "url": trailer["url"],
        "asset_id": trailer["asset_id"],
    })
    .to_string();

    let parts = create_movie_parts("The Matrix", &trailer_json);
    let fields: Vec<(&str, &str)> = parts.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (content_type, body) =
        multipart_body(&fields, Some(("poster", "poster.jpg", b"image-bytes")));

    let (app, _assets) = common::build_test_app_with_assets(pool.clone());
    let response = post_multipart_auth(app, "/api/v1/movies", content_type, body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "The Matrix");

    let movie = MovieRepo::find_by_id(&pool, json["id"].as_i64().unwrap())
        .await
        .unwrap()
        .expect("movie should be persisted");
    assert_eq!(movie.tags, vec!["matrix", "cyberpunk"]);
    assert!(!movie.poster_asset_id.is_empty());
}

/// Missing required fields come back as one validation message each.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_movie_validation(pool: PgPool) {
    let (admin, _pw) = create_test_user(&pool, "admin@test.com", "admin").await;

    let app = common::build_test_app(pool);
    let (content_type, body) = multipart_body(&[("title", "Only a title")], None);
    let response = post_multipart_auth(
        app,
        "/api/v1/movies",
        content_type,
        body,
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let errors = json["error"].as_array().expect("error should be an array");
    assert!(errors.len() >= 5, "each missing field reports once: {errors:?}");
}

/// An unknown genre is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_movie_invalid_genre(pool: PgPool) {
    let (admin, _pw) = create_test_user(&pool, "admin@test.com", "admin").await;

    let trailer_json =
        r#"{"url": "https://assets.test/t.mp4", "asset_id": "trailer-t"}"#.to_string();
    let mut parts = create_movie_parts("Bad Genre", &trailer_json);
    parts.retain(|(k, _)| *k != "genres");
    parts.push(("genres", r#"["telenovela"]"#.to_string()));
    let fields: Vec<(&str, &str)> = parts.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (content_type, body) = multipart_body(&fields, Some(("poster", "p.jpg", b"img")));

    let app = common::build_test_app(pool);
    let response = post_multipart_auth(
        app,
        "/api/v1/movies",
        content_type,
        body,
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let errors = json["error"].as_array().unwrap();
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("telenovela")));
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Public search projects {id, title, poster} and hides private movies.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_public_search_projection(pool: PgPool) {
    seed_movie(&pool, "The Matrix", &["matrix"], "public").await;
    seed_movie(&pool, "The Matrix Resurrections", &["matrix"], "private").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies/search-public?title=matrix").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "The Matrix");
    assert!(hits[0]["poster"].is_string());
    assert!(hits[0].get("trailer").is_none(), "projection is {{id, title, poster}}");
}

/// The related listing never includes the anchor movie and caps at five.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_related_endpoint(pool: PgPool) {
    let anchor = seed_movie(&pool, "Anchor", &["matrix"], "public").await;
    for i in 0..7 {
        seed_movie(&pool, &format!("Related {i}"), &["matrix"], "public").await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies/{anchor}/related")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let related = json.as_array().unwrap();
    assert_eq!(related.len(), 5);
    assert!(related.iter().all(|m| m["id"].as_i64().unwrap() != anchor));
}

/// The public latest listing projects landing-page fields only.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_latest_public_projection(pool: PgPool) {
    seed_movie(&pool, "Public One", &["a"], "public").await;
    seed_movie(&pool, "Private One", &["a"], "private").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies/latest-public").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let movies = json.as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "Public One");
    assert!(movies[0]["trailer"].is_string());
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Deleting a movie destroys both its assets and the document.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_movie_cleans_assets(pool: PgPool) {
    let (admin, _pw) = create_test_user(&pool, "admin@test.com", "admin").await;

    let (app, assets) = common::build_test_app_with_assets(pool.clone());

    // Seed a movie whose asset ids actually live in the store.
    let poster = assets.upload_image(b"img".to_vec(), "p.jpg").await.unwrap();
    let trailer = assets.upload_video(b"vid".to_vec(), "t.mp4").await.unwrap();
    let mut input = movie_input("Doomed", &["gone"], "public");
    input.poster = PosterAsset {
        url: poster.url,
        asset_id: poster.asset_id.clone(),
        responsive: poster.responsive,
    };
    input.trailer_url = trailer.url;
    input.trailer_asset_id = trailer.asset_id.clone();
    let movie = MovieRepo::create(&pool, &input).await.unwrap();

    let response = delete_auth(app, &format!("/api/v1/movies/{}", movie.id), &token_for(&admin))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!assets.contains(&poster.asset_id), "poster asset destroyed");
    assert!(!assets.contains(&trailer.asset_id), "trailer asset destroyed");
    assert!(MovieRepo::find_by_id(&pool, movie.id).await.unwrap().is_none());
}
