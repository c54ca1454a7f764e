//! Multipart form parsing shared by the upload-bearing handlers.
//!
//! Catalog create/update requests arrive as `multipart/form-data`: plain
//! text fields plus at most one binary file part under a well-known name.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::AppError;

/// A binary file part pulled out of a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Text fields plus the optional file part of a multipart form.
#[derive(Debug, Default)]
pub struct ParsedForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl ParsedForm {
    /// A field's trimmed value, if present and non-empty.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// A field parsed from its JSON encoding (arrays and objects arrive as
    /// JSON strings inside text parts).
    pub fn json<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<T>, AppError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON in field '{name}': {e}"))),
        }
    }
}

/// Drain a multipart stream into [`ParsedForm`].
///
/// The part named `file_field` is read as binary; every other part is read
/// as text. Unknown parts are kept (validation decides what matters).
pub async fn parse_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<ParsedForm, AppError> {
    let mut form = ParsedForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == file_field {
            let filename = field.file_name().unwrap_or("upload.bin").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.file = Some(UploadedFile {
                filename,
                data: data.to_vec(),
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}
