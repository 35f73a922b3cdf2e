//! Object key construction and public-URL mapping.

use uuid::Uuid;

/// Longest filename fragment kept in a key.
const MAX_FILENAME_LEN: usize = 80;

/// Key for an uploaded item photo, grouped by owner.
pub fn item_image_key(owner_id: i64, filename: &str) -> String {
    format!("{owner_id}/{}-{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Key for an outfit snapshot or other canvas export.
pub fn snapshot_key(extension: &str) -> String {
    format!("snapshots/{}.{extension}", Uuid::new_v4())
}

/// Strip `base` (a public base URL) from `url`, yielding the object key.
///
/// Returns `None` for URLs that do not point into the store, so callers can
/// skip deleting blobs they do not own.
pub fn strip_base<'a>(url: &'a str, base: &str) -> Option<&'a str> {
    let key = url
        .strip_prefix(base.trim_end_matches('/'))?
        .strip_prefix('/')?;
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Reduce a client-supplied filename to characters safe in an object key.
fn sanitize_filename(filename: &str) -> String {
    let mut out: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        out.push_str("upload");
    }
    out.truncate(MAX_FILENAME_LEN);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
