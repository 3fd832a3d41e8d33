use crate::{
    domain::search::DEFAULT_SEARCH_LIMIT,
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};

/// Runtime settings for a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KanbanConfig {
    /// Name of the blob the board is stored under
    pub storage_key: String,
    /// Maximum number of search hits
    pub search_limit: usize,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            storage_key: "kanban-board".to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl KanbanConfig {
    /// Parses settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "storage key must not be empty".to_string(),
            ));
        }
        if self.storage_key.contains(['/', '\\'])
            || matches!(self.storage_key.as_str(), "." | "..")
        {
            return Err(KanbanError::ConfigError(format!(
                "storage key '{}' must not contain path separators",
                self.storage_key
            )));
        }
        if self.search_limit == 0 {
            return Err(KanbanError::ConfigError(
                "search limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
