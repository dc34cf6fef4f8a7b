pub mod encoding;
pub mod folder;
pub mod schema;
pub mod settings;

pub use encoding::TextEncoding;
pub use folder::{
    prune_empty_directories, remove_empty_directories, toggle_file, PruneOutcome, PruneReport,
};
pub use schema::{default_settings, SchemaDefault, SettingsMap, DEFAULT_SCHEMA};
pub use settings::{Settings, SettingsError, README_FILE_NAME, SETTINGS_FILE_NAME};
