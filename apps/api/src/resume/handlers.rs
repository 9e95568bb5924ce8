//! Axum route handlers for the resume API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CallerId;
use crate::errors::AppError;
use crate::models::resume::Photo;
use crate::resume::normalize::RawResumeFields;
use crate::resume::pipeline::generate_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ArtifactSummary {
    pub name: String,
    /// Pass back to `GET /api/v1/resumes/:stored_name` to download.
    pub stored_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListArtifactsResponse {
    pub artifacts: Vec<ArtifactSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Multipart form: text fields `name, email, phone, location, prompt?,
/// summary?, experience?, education?, skills?` plus an optional `photo`
/// file. Runs the full pipeline and responds with the PDF itself; the
/// artifact is also persisted under the caller's namespace.
pub async fn handle_generate(
    State(state): State<AppState>,
    caller: CallerId,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (raw, photo) = read_form(multipart).await?;

    let artifact = generate_resume(
        state.llm.as_ref(),
        state.renderer.as_ref(),
        state.store.as_ref(),
        &caller.0,
        raw,
        photo,
    )
    .await?;

    Ok(pdf_response(&artifact.stored_name, artifact.bytes))
}

/// GET /api/v1/resumes
///
/// Lists the caller's stored artifacts, newest first.
pub async fn handle_list(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<Json<ListArtifactsResponse>, AppError> {
    let artifacts = state
        .store
        .list(&caller.0)
        .await?
        .into_iter()
        .map(|a| ArtifactSummary {
            name: display_name(&a.stored_name),
            stored_name: a.stored_name,
            created_at: a.created_at,
        })
        .collect();
    Ok(Json(ListArtifactsResponse { artifacts }))
}

/// GET /api/v1/resumes/:stored_name
///
/// Returns the stored PDF bytes for the caller's own artifact.
pub async fn handle_download(
    State(state): State<AppState>,
    caller: CallerId,
    Path(stored_name): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.store.get(&caller.0, &stored_name).await?;
    Ok(pdf_response(&stored_name, bytes))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Drains the multipart form into raw fields plus an optional photo.
/// Unknown fields are ignored; malformed bodies are a caller error.
async fn read_form(mut multipart: Multipart) -> Result<(RawResumeFields, Option<Photo>), AppError> {
    let mut raw = RawResumeFields::default();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "photo" {
            let media_type = field
                .content_type()
                .unwrap_or("image/jpeg")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !bytes.is_empty() {
                photo = Some(Photo { bytes, media_type });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "name" => raw.name = value,
            "email" => raw.email = value,
            "phone" => raw.phone = value,
            "location" => raw.location = value,
            "prompt" => raw.prompt = value,
            "summary" => raw.summary = value,
            "experience" => raw.experience = value,
            "education" => raw.education = value,
            "skills" => raw.skills = value,
            _ => {}
        }
    }

    Ok((raw, photo))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("malformed multipart body: {e}"))
}

fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                // Stored names are already restricted to the storage
                // alphabet, so they are header-safe.
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Derives a human-facing name from a stored name by peeling the extension
/// and the trailing timestamp (and collision counter) segments.
fn display_name(stored_name: &str) -> String {
    let mut stem = stored_name.strip_suffix(".pdf").unwrap_or(stored_name);
    while let Some((head, tail)) = stem.rsplit_once('-') {
        if !head.is_empty() && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            stem = head;
        } else {
            break;
        }
    }
    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_timestamp() {
        assert_eq!(display_name("Jane_Doe-1722945600123.pdf"), "Jane_Doe");
    }

    #[test]
    fn test_display_name_strips_collision_counter() {
        assert_eq!(display_name("Jane_Doe-1722945600123-2.pdf"), "Jane_Doe");
    }

    #[test]
    fn test_display_name_leaves_plain_names_alone() {
        assert_eq!(display_name("resume.pdf"), "resume");
    }
}
