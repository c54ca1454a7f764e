pub mod actors;
pub mod auth;
pub mod directors;
pub mod movies;
pub mod multipart;
pub mod reviews;
pub mod user;
pub mod writers;

use validator::Validate;

use crate::error::AppError;

/// Run validator-derive checks on a payload, flattening field errors into
/// the multi-message validation response.
pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for '{field}'"),
                })
            })
            .collect();
        AppError::ValidationErrors(messages)
    })
}
