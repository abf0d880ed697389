pub mod files;
pub mod metadata;
pub mod migration;
pub mod record;
pub mod repository;
pub mod store;

pub use files::{atomic_write, ensure_dir, get_taskflow_dir, init_local_dir, log_file, meta_file};
pub use metadata::{load_metadata, save_metadata, AppMetadata};
pub use migration::migrate;
pub use repository::TaskRepository;
pub use store::FileStore;
