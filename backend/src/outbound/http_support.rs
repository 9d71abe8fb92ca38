//! Helpers shared by the reqwest adapters.

use reqwest::Url;

/// Collapse whitespace in a response body and truncate it for log and error
/// messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Ensure `base` ends with `/` so relative joins append rather than replace
/// the last path segment.
pub(crate) fn directory_url(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// `status 503` or `status 503: <preview>`.
pub(crate) fn status_message(status: u16, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {preview}")
    }
}
