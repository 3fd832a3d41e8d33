use crate::{domain::Board, error::Result};

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

/// Key-value backend holding named blobs
pub trait StorageBackend {
    /// Reads a blob, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes a blob, replacing any previous value
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Deletes a blob. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Persists the whole board as a single JSON blob
#[derive(Debug)]
pub struct BoardPersistence<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> BoardPersistence<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the stored board.
    ///
    /// Missing, unreadable or corrupt state yields an empty board; the
    /// result always satisfies the column invariants.
    pub fn load(&self) -> Board {
        let bytes = match self.backend.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!("No stored board under '{}', starting empty", self.key);
                return Board::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read board '{}': {e}", self.key);
                return Board::default();
            }
        };

        match serde_json::from_slice::<Board>(&bytes) {
            Ok(mut board) => {
                let repaired = board.normalize();
                if repaired > 0 {
                    tracing::warn!("Repaired {repaired} inconsistent tickets in '{}'", self.key);
                }
                tracing::info!("Loaded board '{}' with {} tickets", self.key, board.len());
                board
            }
            Err(e) => {
                tracing::warn!("Stored board '{}' is corrupt, starting empty: {e}", self.key);
                Board::default()
            }
        }
    }

    /// Overwrites the stored board with `board`
    pub fn save(&mut self, board: &Board) -> Result<()> {
        let json = serde_json::to_vec_pretty(board)?;
        self.backend.set(&self.key, &json).map_err(|e| {
            tracing::error!("Failed to write board '{}': {e}", self.key);
            e
        })
    }
}
