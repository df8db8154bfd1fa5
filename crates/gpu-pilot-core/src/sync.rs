use crate::cache;
use crate::database::GpuDatabase;
use crate::error::{PilotError, Result};

const DATABASE_FILE: &str = "gpu-database.json";

pub struct SyncResult {
    pub entry_count: usize,
}

/// Download a refreshed gpu-database.json, validate, and write to cache.
pub async fn sync_database(url: &str) -> Result<SyncResult> {
    let client = reqwest::Client::new();
    let cache_dir =
        cache::cache_dir().ok_or_else(|| PilotError::Io("cannot determine cache directory".into()))?;

    let text = client
        .get(url)
        .send()
        .await
        .map_err(|e| PilotError::Io(format!("failed to download {DATABASE_FILE}: {e}")))?
        .text()
        .await
        .map_err(|e| PilotError::Io(format!("failed to read {DATABASE_FILE} response: {e}")))?;

    // Validate by parsing before writing.
    let db = GpuDatabase::from_json(&text)?;

    std::fs::write(cache_dir.join(DATABASE_FILE), &text)
        .map_err(|e| PilotError::Io(format!("failed to write {DATABASE_FILE} cache: {e}")))?;

    Ok(SyncResult {
        entry_count: db.len(),
    })
}

/// Load the reference database: cached file if available and valid,
/// otherwise the bundled artifact.
pub fn load_database_cached() -> Result<GpuDatabase> {
    if let Some(path) = cache::cache_path(DATABASE_FILE) {
        if let Ok(content) = std::fs::read_to_string(&path) {
            match GpuDatabase::from_json(&content) {
                Ok(db) => return Ok(db),
                Err(err) => {
                    tracing::warn!(%err, "cached {DATABASE_FILE} is invalid, using bundled copy");
                }
            }
        }
    }
    GpuDatabase::load_bundled()
}
