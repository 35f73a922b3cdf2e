//! Response envelopes.
//!
//! Every endpoint wraps its payload in `{ "data": ... }`; listings add
//! pagination fields alongside it. Typed envelopes keep the shape
//! uniform without `serde_json::json!` at each call site.

use serde::Serialize;

/// `{ "data": T }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total": N, "page": P, "limit": L }`
///
/// `total` counts matching rows across all pages, not the rows in
/// `data`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
