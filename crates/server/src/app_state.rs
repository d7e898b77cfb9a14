use std::sync::Arc;

use crate::file_server::FileServer;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) files: Arc<dyn FileServer>,
}
