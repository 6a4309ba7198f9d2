// Cache store for reading and writing cached data.
// Handles JSON serialization, TTL checking, and filesystem operations.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{EcoError, Result};

/// How long a cached catalogue is served before refetching: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// When the data was cached, in unix milliseconds.
    pub timestamp: i64,
    /// Where the data was fetched from.
    #[serde(default)]
    pub source: String,
    /// The cached data.
    pub data: T,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry stamped with the current time.
    pub fn new(source: impl Into<String>, data: T) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            source: source.into(),
            data,
        }
    }

    /// Age of this entry. Timestamps in the future count as just written.
    pub fn age(&self) -> Duration {
        let elapsed = Utc::now().timestamp_millis().saturating_sub(self.timestamp);
        Duration::from_millis(elapsed.max(0) as u64)
    }

    /// Check if this cached data has expired based on TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }

    /// Check if this entry is still valid for `source`.
    pub fn is_valid_for(&self, source: &str, ttl: Duration) -> bool {
        self.source == source && !self.is_expired(ttl)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    read_json(path)
}

/// Read cached JSON data for `source`, returning None if missing or expired.
pub fn read_if_valid<T: DeserializeOwned>(
    path: &Path,
    source: &str,
    ttl: Duration,
) -> Result<Option<T>> {
    match read_cached::<T>(path)? {
        Some(cached) if cached.is_valid_for(source, ttl) => Ok(Some(cached.data)),
        _ => Ok(None),
    }
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, source: &str, data: &T) -> Result<()> {
    write_json(path, &CachedData::new(source, data))
}

/// Read a plain JSON file, None if it does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| EcoError::cache(path, e))?;
    let value = serde_json::from_str(&contents).map_err(|e| EcoError::cache(path, e))?;
    Ok(Some(value))
}

/// Write a value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| EcoError::cache(path, e))?;
    write_atomic(path, json.as_bytes()).map_err(|e| EcoError::cache(path, e))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| EcoError::cache(path, e))?;
    }
    Ok(())
}
