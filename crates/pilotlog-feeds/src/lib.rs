//! pilotlog-feeds — upload sources for pilotlog.
//!
//! Each source reads one CSV document, decodes it as UTF-8 (lossy) and hands
//! the text to a [`Session`] in a single completion step. This is the only
//! asynchronous boundary in pilotlog; nothing runs in the background.

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

use pilotlog_core::{Session, UploadError, UploadSummary};
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Trait implemented by each upload source.
pub trait CsvSource: Send + Sync {
    /// Human-readable source name for logs and errors.
    fn name(&self) -> String;

    /// Read the whole document as text.
    fn read_text(&self) -> impl Future<Output = Result<String, FeedError>> + Send;
}

/// Read `source` and load it into `session`, replacing its records.
///
/// On [`FeedError::Upload`] the session keeps its previous records.
pub async fn upload<S: CsvSource>(source: &S, session: &mut Session) -> Result<UploadSummary, FeedError> {
    let text = source.read_text().await?;
    tracing::debug!(source = %source.name(), bytes = text.len(), "upload read");
    Ok(session.upload(&text)?)
}

/// Lossy UTF-8 decode with a leading byte-order mark removed.
pub(crate) fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("upload is not valid UTF-8; replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
