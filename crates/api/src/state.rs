use std::sync::Arc;

use wardrobe_storage::BlobStore;

use crate::config::ServerConfig;

/// State handed to every handler through `State<AppState>`. Clones are
/// cheap: the pool is refcounted internally and the rest sits behind
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: wardrobe_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object storage for item photos and outfit previews.
    pub blob_store: Arc<dyn BlobStore>,
}
