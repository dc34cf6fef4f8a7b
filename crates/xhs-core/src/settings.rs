//! Persistent settings store (`settings.json`).
//!
//! [`Settings::run`] is the single entry point used at startup: it moves a
//! settings file left by older releases into place, then either loads the
//! existing file or writes a fresh one with defaults. Loading always runs the
//! compatibility pass, which back-fills keys added to the schema since the
//! file was written and keeps any keys the schema does not know about.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, info};

use crate::encoding::TextEncoding;
use crate::schema::{default_settings, SettingsMap, DEFAULT_SCHEMA};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const README_FILE_NAME: &str = "settings_readme.md";

const README_CONTENT: &str = include_str!("../assets/settings_readme.md");

#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading, writing or moving a file failed.
    #[error("I/O error accessing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a JSON object.
    #[error("invalid settings JSON in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings file {} is not valid UTF-8: {source}", .path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SettingsError + '_ {
    move |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Store for the settings file under a root directory.
#[derive(Debug, Clone)]
pub struct Settings {
    root: PathBuf,
    path: PathBuf,
    user_agent: String,
    encoding: TextEncoding,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>, user_agent: impl Into<String>) -> Self {
        let root = root.into();
        let path = root.join(SETTINGS_FILE_NAME);
        Self {
            root,
            path,
            user_agent: user_agent.into(),
            encoding: TextEncoding::for_host(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join(README_FILE_NAME)
    }

    /// Location used by releases that kept the settings one level above root.
    pub fn legacy_path(&self) -> Option<PathBuf> {
        self.root.parent().map(|p| p.join(SETTINGS_FILE_NAME))
    }

    /// Load the effective settings, creating the file on first run.
    pub fn run(&self) -> Result<SettingsMap, SettingsError> {
        self.migration_file()?;
        if self.path.is_file() {
            self.read()
        } else {
            self.create()
        }
    }

    /// Read the settings file and back-fill missing keys.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Decode`] when the content is not a JSON object. The
    /// file is left untouched in that case.
    pub fn read(&self) -> Result<SettingsMap, SettingsError> {
        let raw = fs::read(&self.path).map_err(io_error(&self.path))?;
        let text = self
            .encoding
            .decode(raw)
            .map_err(|source| SettingsError::Utf8 {
                path: self.path.clone(),
                source,
            })?;
        let data: SettingsMap =
            serde_json::from_str(&text).map_err(|source| SettingsError::Decode {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), keys = data.len(), "loaded settings");
        self.compatible(data)
    }

    /// Write the default settings, plus the readme if it is missing.
    pub fn create(&self) -> Result<SettingsMap, SettingsError> {
        let defaults = default_settings(&self.user_agent);
        self.update(&defaults)?;

        let readme = self.readme_path();
        if !readme.exists() {
            fs::write(&readme, README_CONTENT).map_err(io_error(&readme))?;
            debug!(path = %readme.display(), "wrote settings readme");
        }

        info!(path = %self.path.display(), "created default settings");
        Ok(defaults)
    }

    /// Overwrite the settings file with `data`.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so a failed write never leaves a truncated settings file.
    pub fn update(&self, data: &SettingsMap) -> Result<(), SettingsError> {
        let bytes = self.encoding.encode(&to_pretty_json(data)?);
        let tmp = self.path.with_extension("json.tmp");

        if let Err(source) = fs::write(&tmp, &bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(SettingsError::Io { path: tmp, source });
        }
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }

    /// Insert defaults for schema keys missing from `data` and persist the
    /// result if anything was added. Unknown keys are kept as they are.
    pub fn compatible(&self, mut data: SettingsMap) -> Result<SettingsMap, SettingsError> {
        let mut added = Vec::new();
        for (key, default) in DEFAULT_SCHEMA {
            if !data.contains_key(*key) {
                data.insert(key.to_string(), default.to_value(&self.user_agent));
                added.push(*key);
            }
        }
        if !added.is_empty() {
            info!(path = %self.path.display(), keys = ?added, "added missing settings");
            self.update(&data)?;
        }
        Ok(data)
    }

    /// Move the legacy settings file into root when root has none yet.
    pub fn migration_file(&self) -> Result<(), SettingsError> {
        let Some(legacy) = self.legacy_path() else {
            return Ok(());
        };
        if !legacy.is_file() || self.path.exists() {
            return Ok(());
        }
        move_file(&legacy, &self.path).map_err(io_error(&legacy))?;
        info!(
            from = %legacy.display(),
            to = %self.path.display(),
            "migrated settings file"
        );
        Ok(())
    }
}

/// Serialize with 4-space indentation. Non-ASCII text is written as is.
pub fn to_pretty_json(data: &SettingsMap) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    Ok(buf)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            // rename does not cross filesystems
            debug!(error = %e, "rename failed, falling back to copy");
            copy_then_remove(from, to)
        }
    }
}

/// Copy `from` to `to` and delete `from`. A partial copy is removed again,
/// unless `to` already existed before the call.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let existed = to.exists();
    if let Err(e) = fs::copy(from, to) {
        if !existed {
            let _ = fs::remove_file(to);
        }
        return Err(e);
    }
    fs::remove_file(from)
}
