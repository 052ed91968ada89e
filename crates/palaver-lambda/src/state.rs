use std::sync::Arc;

use palaver_bedrock::client::ModelInvoker;
use palaver_storage::store::ConversationStore;

use crate::config::Config;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConversationStore>,
    pub model: Arc<dyn ModelInvoker>,
    pub config: Arc<Config>,
}
