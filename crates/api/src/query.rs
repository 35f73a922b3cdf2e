//! Shared pagination and filter helpers for list endpoints.
//!
//! List queries run in two phases: phase one resolves the full ordered id
//! set (whose length is the unpaginated `total`), phase two fetches rows
//! for one page of ids. The helpers here clamp page parameters and slice
//! the id set between the two phases.

use wardrobe_core::error::CoreError;
use wardrobe_core::tag::parse_id_list;
use wardrobe_core::types::DbId;

/// Default page size when the client omits `limit`.
pub const DEFAULT_LIMIT: i64 = 20;

/// Hard ceiling on page size.
pub const MAX_LIMIT: i64 = 100;

/// Clamp raw `page`/`limit` query values to sane bounds.
///
/// `page` is 1-based and clamped to at least 1; `limit` is clamped to
/// `1..=MAX_LIMIT`. Missing values fall back to page 1 and [`DEFAULT_LIMIT`].
pub fn page_bounds(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (page, limit)
}

/// Slice one page out of the phase-one id set.
///
/// Pages past the end of the set yield an empty slice rather than an error,
/// so `total` still reports the full match count.
pub fn slice_page<T: Copy>(ids: &[T], page: i64, limit: i64) -> Vec<T> {
    let start = ((page - 1) * limit) as usize;
    if start >= ids.len() {
        return Vec::new();
    }
    let end = (start + limit as usize).min(ids.len());
    ids[start..end].to_vec()
}

/// Parse an optional comma-separated id filter from the query string.
///
/// An absent parameter means "no filter" and parses to an empty list.
pub fn parse_opt_ids(raw: Option<&str>) -> Result<Vec<DbId>, CoreError> {
    match raw {
        Some(raw) => parse_id_list(raw),
        None => Ok(Vec::new()),
    }
}
