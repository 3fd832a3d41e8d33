use crate::{error::Result, storage::StorageBackend};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// File-based storage backend: one JSON file per key
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const EXTENSION: &'static str = "json";

    /// Creates a new FileStorage rooted at the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    fn entry_file(&self, key: &str) -> PathBuf {
        self.root_path.join(format!("{}.{}", key, Self::EXTENSION))
    }

    fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.entry_file(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_directory_exists()?;
        fs::write(self.entry_file(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_file(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
