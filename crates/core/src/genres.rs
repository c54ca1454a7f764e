//! Fixed genre vocabulary for movies.

use crate::error::CoreError;

/// Every genre a movie may carry. Anything outside this list is rejected
/// at validation time.
pub const GENRES: &[&str] = &[
    "action",
    "adventure",
    "animation",
    "comedy",
    "crime",
    "documentary",
    "drama",
    "family",
    "fantasy",
    "history",
    "horror",
    "music",
    "mystery",
    "romance",
    "sci-fi",
    "sport",
    "thriller",
    "war",
    "western",
];

pub fn is_valid_genre(genre: &str) -> bool {
    GENRES.contains(&genre)
}

/// Validate a genre list against the vocabulary.
///
/// Returns the first offending genre as a [`CoreError::Validation`].
pub fn validate_genres(genres: &[String]) -> Result<(), CoreError> {
    for genre in genres {
        if !is_valid_genre(genre) {
            return Err(CoreError::Validation(format!("Invalid genre '{genre}'")));
        }
    }
    Ok(())
}
