pub mod aggregation;
pub mod app;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod lookup;
pub mod models;
pub mod range;
pub mod state;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use state::AppState;
pub use storage::{load_dataset, resolve_data_path};
