//! Configuration file domain.
//!
//! - `value`: the structured value every uploaded document decodes into
//! - `file`: extension-driven parsing of a selected file
//! - `preview`: pretty-printed previews
//! - `model`: records exchanged with the backend

mod file;
mod model;
mod preview;
mod value;

pub use file::{
    ConfigFile, ConfigFormat, ParseFailure, ParsedConfig, ValidationOutcome, file_extension,
    parse_config_file, parse_json, parse_yaml,
};
pub use model::{ConfigDetail, ConfigSummary, DashboardStats, Environment, RecordId, Timestamp};
pub use preview::{DEFAULT_PREVIEW_LINES, Preview, pretty_print};
pub use value::{ConfigMap, ConfigValue};
