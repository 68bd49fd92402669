//! Synced key/value storage for the user's display name.
//!
//! A small JSON object on disk. Only [`DISPLAY_NAME_KEY`] is read or written
//! here; other keys are preserved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Storage key holding the chosen display name.
pub const DISPLAY_NAME_KEY: &str = "addedBy";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("profile at {path} is not a JSON object: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no configuration directory available")]
    NoConfigDir,
}

pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/bidclaim/profile.json`.
    pub fn default_path() -> Result<PathBuf, ProfileError> {
        dirs::config_dir()
            .map(|d| d.join("bidclaim").join("profile.json"))
            .ok_or(ProfileError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored display name. A missing file or blank value reads as `None`.
    pub fn display_name(&self) -> Result<Option<String>, ProfileError> {
        let map = self.load()?;
        let name = map
            .get(DISPLAY_NAME_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        debug!(path = %self.path.display(), found = name.is_some(), "read display name");
        Ok(name)
    }

    pub fn set_display_name(&self, name: &str) -> Result<(), ProfileError> {
        let mut map = self.load()?;
        map.insert(DISPLAY_NAME_KEY.to_string(), Value::String(name.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(map)).map_err(|source| {
            ProfileError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, body).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), "display name saved");
        Ok(())
    }

    fn load(&self) -> Result<Map<String, Value>, ProfileError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).map_err(|source| ProfileError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> ProfileError {
        ProfileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
