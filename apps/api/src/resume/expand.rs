//! Content Expander — converts a short free-text prompt into a structured
//! [`ResumeFragment`] via the text-generation capability.
//!
//! HARD REQUIREMENT: this step never fails the request. Any failure —
//! transport, API, timeout, unparsable reply — degrades to a fragment that
//! carries the caller's prompt verbatim as the summary, so a renderable
//! document is always produced.

use tracing::warn;

use crate::llm_client::{json_from_first_brace, strip_json_fences, TextGenerator};
use crate::models::resume::ResumeFragment;
use crate::resume::normalize::clean_skills;
use crate::resume::prompts::{EXPAND_PROMPT_TEMPLATE, EXPAND_SYSTEM};

/// Expands `prompt_text` into a resume fragment. One outbound call, no
/// retry; infallible from the pipeline's point of view.
pub async fn expand_prompt(text_gen: &dyn TextGenerator, prompt_text: &str) -> ResumeFragment {
    let prompt = EXPAND_PROMPT_TEMPLATE.replace("{notes}", prompt_text);

    let reply = match text_gen.generate(EXPAND_SYSTEM, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Content expansion call failed, degrading to verbatim notes: {e}");
            return fallback_fragment(prompt_text);
        }
    };

    // The capability may preface its JSON with prose or wrap it in fences
    // despite the system prompt; coerce before parsing.
    let json = json_from_first_brace(strip_json_fences(&reply));
    match serde_json::from_str::<ResumeFragment>(json) {
        Ok(mut fragment) => {
            fragment.skills = clean_skills(fragment.skills);
            fragment
        }
        Err(e) => {
            warn!("Content expansion reply was unparsable, degrading to verbatim notes: {e}");
            fallback_fragment(prompt_text)
        }
    }
}

/// The total fallback: the caller's own words become the summary, all
/// structured sections stay empty.
fn fallback_fragment(prompt_text: &str) -> ResumeFragment {
    ResumeFragment {
        summary: prompt_text.to_string(),
        ..Default::default()
    }
}
