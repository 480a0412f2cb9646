use std::path::Path;

use fleetwatch_core::error::CoreError;

/// Read the entire current content of the log at `path`.
///
/// The file is opened, read to completion and closed within this call; no
/// handle outlives it. Invalid UTF-8 is replaced rather than rejected so a
/// torn or binary tail never fails the pass.
pub async fn read_log(path: &Path) -> Result<String, CoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to read log source");
        CoreError::source_unavailable(path, &e)
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
