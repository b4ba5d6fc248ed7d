//! Project file I/O

use super::Project;
use crate::types::*;
use std::path::Path;

impl Project {
    /// Load a project file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Replace the working state with a project file; on failure the current
    /// state is kept
    pub async fn reload(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let json = tokio::fs::read_to_string(path).await?;
        self.replace_from_json(&json)
    }

    /// Write the project as pretty-printed JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
