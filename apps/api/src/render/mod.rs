// Rendering: canonical resume record → styled HTML → paginated PDF.
// document is pure and deterministic; pdf drives the external engine and
// must run its blocking work inside tokio::task::spawn_blocking.

pub mod document;
pub mod pdf;
