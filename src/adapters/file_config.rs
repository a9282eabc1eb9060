//! JSON file config adapter.
//!
//! Same fields as [`SystemConfig`], flat; anything omitted takes its
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for FileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", self.path.display())))?;
        let c: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        c.validate()?;
        Ok(c)
    }
}
