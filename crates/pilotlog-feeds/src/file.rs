//! File upload source.

use crate::{decode, CsvSource, FeedError};
use std::path::PathBuf;

/// A CSV file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> Result<String, FeedError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| FeedError::Io {
            path: self.name(),
            source,
        })?;
        Ok(decode(bytes))
    }
}
