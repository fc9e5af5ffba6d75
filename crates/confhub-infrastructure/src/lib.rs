pub mod app_config;
pub mod file_reader;
pub mod paths;
pub mod storage;

pub use crate::app_config::AppConfig;
pub use crate::file_reader::read_config_file;
pub use crate::paths::ConfhubPaths;
pub use crate::storage::FileCredentialStore;
