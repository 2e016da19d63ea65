use std::path::Path;

/// Create the temporary directory if needed and remove anything a previous
/// run left behind. Returns how many entries were removed.
pub async fn prepare_temp_dir(path: &Path) -> std::io::Result<usize> {
    tokio::fs::create_dir_all(path).await?;

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        let result = if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&entry_path).await
        } else {
            tokio::fs::remove_file(&entry_path).await
        };

        match result {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = %entry_path.display(), error = %e, "Failed to remove leftover temp entry"),
        }
    }

    if removed > 0 {
        tracing::info!(path = %path.display(), removed, "Temp directory cleaned");
    }
    Ok(removed)
}
