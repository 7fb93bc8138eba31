pub mod storage;
pub mod types;

pub use storage::{get_results_path, load_history, save_history};
pub use types::{ResultHistory, StoredResult, HISTORY_VERSION};
