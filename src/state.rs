use crate::models::Dataset;
use crate::view::ViewState;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub view: Arc<Mutex<ViewState>>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let dataset = Arc::new(dataset);
        Self {
            view: Arc::new(Mutex::new(ViewState::new(Arc::clone(&dataset)))),
            dataset,
        }
    }
}
