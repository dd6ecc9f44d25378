//! Labeling page, static assets and image bytes.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::constants::LABELING_TEMPLATE;
use crate::server::AppState;
use crate::server::api::ApiError;

/// Placeholder in the labeling template replaced by the first image name.
const IMAGE_PLACEHOLDER: &str = "{{ image }}";

pub(crate) async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let template_path = state.templates_dir.join(LABELING_TEMPLATE);
    let template = tokio::fs::read_to_string(&template_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Cannot read {:?}: {}", template_path, e)))?;

    let store = state.store.lock().await;
    let first = store.catalog().filename_at(0)?;
    Ok(Html(render_template(&template, first)))
}

pub(crate) async fn asset_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let full = resolve_under(&state.assets_dir, &path)
        .ok_or_else(|| ApiError::NotFound(format!("No asset '{}'", path)))?;
    send_file(&full).await
}

pub(crate) async fn image_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    // Only catalog images are served, never arbitrary files from the folder
    let full = {
        let store = state.store.lock().await;
        let catalog = store.catalog();
        let index = catalog
            .position(&filename)
            .ok_or_else(|| ApiError::NotFound(format!("No image '{}'", filename)))?;
        catalog.image_path(index)?
    };
    send_file(&full).await
}

async fn send_file(path: &FsPath) -> Result<Response, ApiError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type(path))], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound(format!("No file {:?}", path)))
        }
        Err(e) => Err(ApiError::Internal(format!("Cannot read {:?}: {}", path, e))),
    }
}

/// Join `relative` onto `root`, refusing anything that could escape it.
fn resolve_under(root: &FsPath, relative: &str) -> Option<PathBuf> {
    let relative = FsPath::new(relative.trim_start_matches('/'));
    let safe = relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    safe.then(|| root.join(relative))
}

fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn render_template(template: &str, image: &str) -> String {
    template.replace(IMAGE_PLACEHOLDER, &escape_html(image))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_under_rejects_escapes() {
        let root = FsPath::new("assets");
        assert_eq!(
            resolve_under(root, "js/labeling.js"),
            Some(PathBuf::from("assets/js/labeling.js"))
        );
        assert_eq!(
            resolve_under(root, "/labeling.css"),
            Some(PathBuf::from("assets/labeling.css"))
        );
        assert_eq!(resolve_under(root, "../secret.txt"), None);
        assert_eq!(resolve_under(root, "js/../../secret.txt"), None);
        assert_eq!(resolve_under(root, ""), None);
    }

    #[test]
    fn test_render_template_escapes() {
        let page = render_template("<h1>{{ image }}</h1>", "a<b>&.jpg");
        assert_eq!(page, "<h1>a&lt;b&gt;&amp;.jpg</h1>");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(FsPath::new("x.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(FsPath::new("x.jpeg")), "image/jpeg");
        assert_eq!(content_type(FsPath::new("x")), "application/octet-stream");
    }
}
