//! Shared handler state.

use notepad_ai::{AssistClient, CompletionBackend};
use std::sync::Arc;

pub type SharedBackend = Arc<dyn CompletionBackend>;

#[derive(Clone)]
pub struct AppState {
    pub assist: Arc<AssistClient<SharedBackend>>,
}

impl AppState {
    pub fn new(backend: impl CompletionBackend + 'static) -> Self {
        let backend: SharedBackend = Arc::new(backend);
        Self {
            assist: Arc::new(AssistClient::new(backend)),
        }
    }
}
