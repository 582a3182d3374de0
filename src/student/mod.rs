mod lenient;
pub mod profile;
pub mod storage;
pub mod types;
pub mod validation;

pub use profile::{apply_profile_update, ProfileUpdate};
pub use storage::{get_snapshot_path, load_snapshot, save_snapshot};
pub use types::*;
pub use validation::validate_snapshot;
