//! Reading JSON snapshots of upstream content.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Read a JSON array of records. Malformed records reject the whole snapshot.
pub(crate) fn read_records<T: DeserializeOwned>(
    fs: &dyn FileSystem,
    path: &Path,
    what: &str,
) -> ApplicationResult<Vec<T>> {
    if !fs.exists(path) {
        return Err(ApplicationError::OperationFailed {
            context: format!("{} not found: {}", what, path.display()),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file does not exist",
            )),
        });
    }

    let content = fs
        .read_to_string(path)
        .with_path_context(&format!("read {what}"), path)?;
    let records: Vec<T> = serde_json::from_str(&content)
        .map_err(|e| ApplicationError::invalid_content(path, e.to_string()))?;

    debug!("read {} {} from {}", records.len(), what, path.display());
    Ok(records)
}
