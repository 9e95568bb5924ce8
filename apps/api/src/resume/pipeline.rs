//! The full generation pipeline: normalize → (optional) expand → render →
//! produce PDF → store.
//!
//! Each invocation is request-local: the record, photo, and rendered
//! document are owned by this call and shared with nothing.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::resume::Photo;
use crate::render::document::build_document;
use crate::render::pdf::PdfRenderer;
use crate::resume::expand::expand_prompt;
use crate::resume::normalize::{self, RawResumeFields, ResumeIntake};
use crate::storage::ArtifactStore;

/// The result of one successful generation: the PDF bytes handed back to
/// the caller and the name the artifact was stored under.
#[derive(Debug)]
pub struct GeneratedArtifact {
    pub bytes: Vec<u8>,
    pub stored_name: String,
}

/// Runs the pipeline end to end for one caller.
///
/// Expansion failures degrade silently inside `expand_prompt`; rendering
/// and storage failures are fatal and surface with their own error kinds.
pub async fn generate_resume(
    text_gen: &dyn TextGenerator,
    renderer: &dyn PdfRenderer,
    store: &dyn ArtifactStore,
    caller_id: &str,
    raw: RawResumeFields,
    photo: Option<Photo>,
) -> Result<GeneratedArtifact, AppError> {
    if raw.name.trim().is_empty() && raw.prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "resume must include a name or a prompt".to_string(),
        ));
    }

    let fragment = match normalize::classify(&raw) {
        ResumeIntake::PromptDriven { text } => expand_prompt(text_gen, &text).await,
        ResumeIntake::Structured => normalize::parse_structured(&raw),
    };
    let record = normalize::into_record(&raw, fragment);

    let html = build_document(&record, photo.as_ref());
    let bytes = renderer.render(&html).await?;

    let display_name = if record.name.is_empty() {
        "resume"
    } else {
        record.name.as_str()
    };
    let stored = store.put(caller_id, display_name, &bytes).await?;

    info!(
        "Generated resume '{}' ({} bytes) as {}",
        display_name,
        bytes.len(),
        stored.stored_name
    );

    Ok(GeneratedArtifact {
        bytes,
        stored_name: stored.stored_name,
    })
}
