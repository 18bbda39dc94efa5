// JSON array files, one per series, replaced wholesale on every write.

use super::HistoryError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Missing or unreadable files yield an empty series.
pub(super) async fn read_series<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no history file yet, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "history file unreadable, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "history file corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Write to a sibling temp file, then rename over the target.
pub(super) async fn write_series<S: Serialize + ?Sized>(
    path: &Path,
    entries: &S,
) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec(entries)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
