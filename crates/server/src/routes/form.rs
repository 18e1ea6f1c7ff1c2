//! Form body extraction for the create/update routes.
//!
//! Accepts `multipart/form-data` (fields plus an optional image part) and
//! `application/x-www-form-urlencoded` (fields only). Any other content type
//! yields an empty form, which then fails validation with "missing params".

use crate::error::ServerError;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Form;
use coffee_journey::{Bytes, CoffeeFields, ValidationError};
use std::collections::HashMap;

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Text fields and at most one upload from a coffee form.
///
/// Repeated fields keep their first value. Only the first file part is kept;
/// later ones are read to the end and dropped.
#[derive(Debug, Default)]
pub struct CoffeeForm {
    fields: HashMap<String, String>,
    pub image: Option<Upload>,
}

/// Whether required text fields are trimmed before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    Trimmed,
    Untouched,
}

impl CoffeeForm {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Validate the text fields into [`CoffeeFields`]. The price is always
    /// trimmed.
    pub fn coffee_fields(&self, trim: Trim) -> Result<CoffeeFields, ValidationError> {
        let text = |key: &str| {
            self.get(key).map(|v| match trim {
                Trim::Trimmed => v.trim(),
                Trim::Untouched => v,
            })
        };
        CoffeeFields::from_form(text("name"), text("company"), text("tags"), self.get("price"))
    }

    fn insert_field(&mut self, name: String, value: String) {
        self.fields.entry(name).or_insert(value);
    }
}

impl<S> FromRequest<S> for CoffeeForm
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ServerError::MalformedForm(e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        ServerError::PayloadTooLarge
                    } else {
                        ServerError::MalformedForm(e.body_text())
                    }
                })?;
            let mut form = CoffeeForm::default();
            for (name, value) in pairs {
                form.insert_field(name, value);
            }
            Ok(form)
        } else {
            Ok(CoffeeForm::default())
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<CoffeeForm, ServerError> {
    let mut form = CoffeeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                // Drain every file part so the body is fully consumed.
                let data = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty, unnamed part when no file was chosen.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                if form.image.is_none() {
                    tracing::debug!(
                        field = %name,
                        file_name = %file_name,
                        size = data.len(),
                        "received upload"
                    );
                    form.image = Some(Upload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.insert_field(name, value);
            }
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::MalformedForm(err.body_text())
    }
}
