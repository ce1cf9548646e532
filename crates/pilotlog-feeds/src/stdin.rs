//! Standard-input upload source, for `pilotlog report -`.

use crate::{decode, CsvSource, FeedError};
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl CsvSource for StdinSource {
    fn name(&self) -> String {
        "<stdin>".to_string()
    }

    async fn read_text(&self) -> Result<String, FeedError> {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .map_err(|source| FeedError::Io {
                path: self.name(),
                source,
            })?;
        Ok(decode(bytes))
    }
}
