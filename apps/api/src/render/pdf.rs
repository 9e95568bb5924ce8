//! Artifact Producer — renders an HTML document to a paginated PDF via
//! headless Chrome.
//!
//! The engine is driven behind the [`PdfRenderer`] trait, carried in
//! `AppState` as `Arc<dyn PdfRenderer>`, so the pipeline and its tests never
//! depend on a real browser. The blocking CDP session runs inside
//! `tokio::task::spawn_blocking`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use thiserror::Error;

/// Hard bound on one render, launch included. An engine that exceeds it is
/// treated like any other engine failure: fatal to the request, no retry.
const RENDER_TIMEOUT: Duration = Duration::from_secs(45);

// A4 portrait in inches, margins 20 mm top/bottom and 15 mm left/right.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;
const MARGIN_TOP_BOTTOM_IN: f64 = 0.79;
const MARGIN_LEFT_RIGHT_IN: f64 = 0.59;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch rendering engine: {0}")]
    Launch(String),

    #[error("rendering engine failed: {0}")]
    Engine(String),

    #[error("rendering timed out after {0:?}")]
    Timeout(Duration),
}

/// HTML-to-PDF rendering capability.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Production renderer: one headless Chrome session per request. The
/// `Browser` handle owns the Chrome process; dropping it tears the session
/// down on every exit path. A timed-out render is abandoned to finish (and
/// drop its browser) on the blocking pool.
pub struct ChromePdfRenderer;

#[async_trait]
impl PdfRenderer for ChromePdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let html = html.to_owned();
        let render = tokio::task::spawn_blocking(move || print_to_pdf(&html));
        match tokio::time::timeout(RENDER_TIMEOUT, render).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(RenderError::Engine(join_err.to_string())),
            Err(_) => Err(RenderError::Timeout(RENDER_TIMEOUT)),
        }
    }
}

fn print_to_pdf(html: &str) -> Result<Vec<u8>, RenderError> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .build()
        .map_err(|e| RenderError::Launch(e.to_string()))?;

    let browser = Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))?;
    let tab = browser
        .new_tab()
        .map_err(|e| RenderError::Engine(e.to_string()))?;

    // The document is fully self-contained (styles inline, photo as a data
    // URL), so once navigation settles everything has loaded.
    let url = format!("data:text/html;base64,{}", BASE64.encode(html));
    tab.navigate_to(&url)
        .map_err(|e| RenderError::Engine(e.to_string()))?;
    tab.wait_until_navigated()
        .map_err(|e| RenderError::Engine(e.to_string()))?;

    tab.print_to_pdf(Some(a4_portrait()))
        .map_err(|e| RenderError::Engine(e.to_string()))
}

fn a4_portrait() -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        margin_top: Some(MARGIN_TOP_BOTTOM_IN),
        margin_bottom: Some(MARGIN_TOP_BOTTOM_IN),
        margin_left: Some(MARGIN_LEFT_RIGHT_IN),
        margin_right: Some(MARGIN_LEFT_RIGHT_IN),
        ..PrintToPdfOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_setup_is_a4_portrait_with_backgrounds() {
        let opts = a4_portrait();
        assert_eq!(opts.print_background, Some(true));
        assert_eq!(opts.paper_width, Some(8.27));
        assert_eq!(opts.paper_height, Some(11.69));
        assert_eq!(opts.margin_top, opts.margin_bottom);
        assert_eq!(opts.margin_left, opts.margin_right);
        assert_eq!(opts.landscape, None);
    }
}
