use crate::ScrapeError;
use crate::results::PageRecord;
use std::path::{Path, PathBuf};

/// Creates `dir` and any missing parents. An existing directory is left as is.
pub async fn ensure_dir(dir: &Path) -> Result<(), ScrapeError> {
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(ScrapeError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Writes `record` as indented JSON to `dir/filename`, replacing any previous file
pub async fn write_record(
    dir: &Path,
    filename: &str,
    record: &PageRecord,
) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(filename);
    let json = serde_json::to_string_pretty(record)?;

    tokio::fs::write(&path, json)
        .await
        .map_err(|source| ScrapeError::Io {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}
