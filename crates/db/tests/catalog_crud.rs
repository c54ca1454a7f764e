//! Integration tests for catalog CRUD operations.
//!
//! Exercises the repository layer against a real database:
//! - Movie creation with cast and writer lists
//! - Unique constraint violations (title, email)
//! - Cascading cleanup when actors/writers/directors are deleted
//! - Merge semantics of partial updates
//! - Substring search

use chrono::NaiveDate;
use reelbase_db::models::actor::{CreateActor, UpdateActor};
use reelbase_db::models::director::CreateDirector;
use reelbase_db::models::movie::{CastEntryInput, CreateMovie, PosterAsset, UpdateMovie};
use reelbase_db::models::user::CreateUser;
use reelbase_db::models::writer::CreateWriter;
use reelbase_db::repositories::{
    ActorRepo, DirectorRepo, MovieRepo, UserRepo, WriterRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_actor(name: &str) -> CreateActor {
    CreateActor {
        name: name.to_string(),
        about: format!("{name} is an actor"),
        gender: "male".to_string(),
        avatar_url: None,
        avatar_asset_id: None,
    }
}

fn new_movie(title: &str, tags: &[&str]) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        story_line: "A story".to_string(),
        director_id: None,
        release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
        status: "public".to_string(),
        kind: "Film".to_string(),
        language: "English".to_string(),
        genres: vec!["action".to_string(), "sci-fi".to_string()],
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

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

/// Creating a movie persists its cast entries in order.
#[sqlx::test]
async fn test_create_movie_with_cast(pool: PgPool) {
    let keanu = ActorRepo::create(&pool, &new_actor("Keanu Reeves")).await.unwrap();
    let carrie = ActorRepo::create(&pool, &new_actor("Carrie-Anne Moss")).await.unwrap();

    let mut input = new_movie("The Matrix", &["matrix", "cyberpunk"]);
    input.cast = vec![
        CastEntryInput {
            actor_id: keanu.id,
            role_as: "Neo".to_string(),
            lead_actor: true,
        },
        CastEntryInput {
            actor_id: carrie.id,
            role_as: "Trinity".to_string(),
            lead_actor: false,
        },
    ];
    let movie = MovieRepo::create(&pool, &input).await.unwrap();

    let cast = MovieRepo::cast_for(&pool, movie.id).await.unwrap();
    assert_eq!(cast.len(), 2);
    assert_eq!(cast[0].name, "Keanu Reeves");
    assert_eq!(cast[0].role_as, "Neo");
    assert!(cast[0].lead_actor);
    assert_eq!(cast[1].name, "Carrie-Anne Moss");
    assert!(!cast[1].lead_actor);
}

/// Two movies with the same title: the second insert violates the unique
/// title constraint.
#[sqlx::test]
async fn test_duplicate_title_conflicts(pool: PgPool) {
    MovieRepo::create(&pool, &new_movie("The Matrix", &["matrix"]))
        .await
        .unwrap();

    let err = MovieRepo::create(&pool, &new_movie("The Matrix", &["matrix"]))
        .await
        .unwrap_err();

    let sqlx::Error::Database(db_err) = err else {
        panic!("expected a database error, got {err:?}");
    };
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_movies_title"));
}

/// Partial update: absent fields keep their stored value, present lists
/// replace wholesale.
#[sqlx::test]
async fn test_update_merges_fields(pool: PgPool) {
    let movie = MovieRepo::create(&pool, &new_movie("Dune", &["desert"]))
        .await
        .unwrap();

    let update = UpdateMovie {
        story_line: Some("Spice must flow".to_string()),
        tags: Some(vec!["desert".to_string(), "spice".to_string()]),
        ..Default::default()
    };
    let updated = MovieRepo::update(&pool, movie.id, &update)
        .await
        .unwrap()
        .expect("movie should exist");

    assert_eq!(updated.title, "Dune", "absent title must keep stored value");
    assert_eq!(updated.story_line, "Spice must flow");
    assert_eq!(updated.tags, vec!["desert", "spice"]);
    assert_eq!(updated.status, "public", "absent status must keep stored value");
}

/// Updating a missing movie returns None, not an error.
#[sqlx::test]
async fn test_update_missing_movie(pool: PgPool) {
    let result = MovieRepo::update(&pool, 4242, &UpdateMovie::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

/// Case-insensitive, unanchored substring search on title.
#[sqlx::test]
async fn test_movie_search_is_substring_and_case_insensitive(pool: PgPool) {
    MovieRepo::create(&pool, &new_movie("The Matrix Reloaded", &["matrix"]))
        .await
        .unwrap();

    let hits = MovieRepo::search(&pool, "atrix relo", false).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "The Matrix Reloaded");
}

/// Public search must not expose private movies.
#[sqlx::test]
async fn test_public_search_filters_private(pool: PgPool) {
    let mut private = new_movie("Secret Cut", &["hidden"]);
    private.status = "private".to_string();
    MovieRepo::create(&pool, &private).await.unwrap();

    let all = MovieRepo::search(&pool, "secret", false).await.unwrap();
    assert_eq!(all.len(), 1);

    let public = MovieRepo::search(&pool, "secret", true).await.unwrap();
    assert!(public.is_empty());
}

// ---------------------------------------------------------------------------
// Cascading cleanup
// ---------------------------------------------------------------------------

/// Deleting an actor removes exactly that actor's cast entries and leaves
/// other entries untouched.
#[sqlx::test]
async fn test_actor_delete_cleans_cast(pool: PgPool) {
    let keanu = ActorRepo::create(&pool, &new_actor("Keanu Reeves")).await.unwrap();
    let carrie = ActorRepo::create(&pool, &new_actor("Carrie-Anne Moss")).await.unwrap();

    let mut input = new_movie("The Matrix", &["matrix"]);
    input.cast = vec![
        CastEntryInput {
            actor_id: keanu.id,
            role_as: "Neo".to_string(),
            lead_actor: true,
        },
        CastEntryInput {
            actor_id: carrie.id,
            role_as: "Trinity".to_string(),
            lead_actor: false,
        },
    ];
    let movie = MovieRepo::create(&pool, &input).await.unwrap();

    assert!(ActorRepo::delete(&pool, keanu.id).await.unwrap());

    let cast = MovieRepo::cast_for(&pool, movie.id).await.unwrap();
    assert_eq!(cast.len(), 1, "only the deleted actor's entries go away");
    assert_eq!(cast[0].name, "Carrie-Anne Moss");

    // The movie itself survives.
    assert!(MovieRepo::find_by_id(&pool, movie.id).await.unwrap().is_some());
}

/// Deleting a writer removes it from every movie's writer list.
#[sqlx::test]
async fn test_writer_delete_cleans_references(pool: PgPool) {
    let lilly = WriterRepo::create(
        &pool,
        &CreateWriter {
            name: "Lilly Wachowski".to_string(),
            avatar_url: None,
            avatar_asset_id: None,
        },
    )
    .await
    .unwrap();
    let lana = WriterRepo::create(
        &pool,
        &CreateWriter {
            name: "Lana Wachowski".to_string(),
            avatar_url: None,
            avatar_asset_id: None,
        },
    )
    .await
    .unwrap();

    let mut input = new_movie("The Matrix", &["matrix"]);
    input.writer_ids = vec![lilly.id, lana.id];
    let movie = MovieRepo::create(&pool, &input).await.unwrap();

    assert!(WriterRepo::delete(&pool, lilly.id).await.unwrap());

    let writers = MovieRepo::writers_for(&pool, movie.id).await.unwrap();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].name, "Lana Wachowski");
}

/// Deleting a director nulls out the movie's director reference.
#[sqlx::test]
async fn test_director_delete_sets_null(pool: PgPool) {
    let director = DirectorRepo::create(
        &pool,
        &CreateDirector {
            name: "Denis Villeneuve".to_string(),
            avatar_url: None,
            avatar_asset_id: None,
        },
    )
    .await
    .unwrap();

    let mut input = new_movie("Dune", &["desert"]);
    input.director_id = Some(director.id);
    let movie = MovieRepo::create(&pool, &input).await.unwrap();
    assert_eq!(movie.director_id, Some(director.id));

    assert!(DirectorRepo::delete(&pool, director.id).await.unwrap());

    let movie = MovieRepo::find_by_id(&pool, movie.id).await.unwrap().unwrap();
    assert_eq!(movie.director_id, None);
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// Substring search: "ree" matches "Keanu Reeves" regardless of case.
#[sqlx::test]
async fn test_actor_search_substring(pool: PgPool) {
    ActorRepo::create(&pool, &new_actor("Keanu Reeves")).await.unwrap();
    ActorRepo::create(&pool, &new_actor("Laurence Fishburne")).await.unwrap();

    let hits = ActorRepo::search(&pool, "ree").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Keanu Reeves");
}

/// Actor update merges: absent fields fall back to stored values.
#[sqlx::test]
async fn test_actor_update_merges(pool: PgPool) {
    let actor = ActorRepo::create(&pool, &new_actor("Keanu Reeves")).await.unwrap();

    let update = UpdateActor {
        about: Some("Also in John Wick".to_string()),
        ..Default::default()
    };
    let updated = ActorRepo::update(&pool, actor.id, &update)
        .await
        .unwrap()
        .expect("actor should exist");

    assert_eq!(updated.name, "Keanu Reeves");
    assert_eq!(updated.about, "Also in John Wick");
    assert_eq!(updated.gender, "male");
}

/// Pagination: page two picks up where page one stopped, newest first.
#[sqlx::test]
async fn test_actor_pagination(pool: PgPool) {
    for i in 0..5 {
        ActorRepo::create(&pool, &new_actor(&format!("Actor {i}"))).await.unwrap();
    }

    let page_one = ActorRepo::list(&pool, 2, 0).await.unwrap();
    let page_two = ActorRepo::list(&pool, 2, 2).await.unwrap();
    assert_eq!(page_one.len(), 2);
    assert_eq!(page_two.len(), 2);
    assert!(page_one.iter().all(|a| page_two.iter().all(|b| b.id != a.id)));

    let count = ActorRepo::count(&pool).await.unwrap();
    assert_eq!(count, 5);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Duplicate emails violate the users unique constraint.
#[sqlx::test]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    let input = CreateUser {
        name: "Ada".to_string(),
        email: "ada@test.com".to_string(),
        password_hash: "hash".to_string(),
    };
    UserRepo::create(&pool, &input).await.unwrap();

    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    let sqlx::Error::Database(db_err) = err else {
        panic!("expected a database error, got {err:?}");
    };
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

/// New users start unverified with the default role.
#[sqlx::test]
async fn test_user_defaults(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Ada".to_string(),
            email: "ada@test.com".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(!user.is_verified);
    assert_eq!(user.role, "user");

    assert!(UserRepo::mark_verified(&pool, user.id).await.unwrap());
    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(user.is_verified);
}
