// Catalogue loading.
// Resolves the source, serves a fresh cached copy when possible, otherwise fetches and caches.

pub mod client;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache;
use crate::catalog::Catalog;
use crate::error::{EcoError, Result};

pub use client::CatalogClient;

/// Where the ecosystem document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(String),
    File(PathBuf),
}

impl Source {
    /// Treat http(s) locations as remote, anything else as a local path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Remote(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads catalogues with an optional time-boxed document cache.
#[derive(Debug, Clone)]
pub struct DataLoader {
    client: CatalogClient,
    cache_path: Option<PathBuf>,
    ttl: Duration,
    read_cache: bool,
}

impl DataLoader {
    /// Create a loader. `cache_path` of None disables caching.
    pub fn new(client: CatalogClient, cache_path: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            client,
            cache_path,
            ttl,
            read_cache: true,
        }
    }

    /// Skip cache reads (fresh entries are still written).
    pub fn bypass_cache(mut self, bypass: bool) -> Self {
        self.read_cache = !bypass;
        self
    }

    /// Load and normalize the catalogue from `source`.
    pub async fn load(&self, source: &Source) -> Result<Catalog> {
        match source {
            Source::File(path) => {
                let text = tokio::fs::read_to_string(path).await?;
                let document: Value = serde_json::from_str(&text)?;
                normalize(&document)
            }
            Source::Remote(url) => self.load_remote(url).await,
        }
    }

    async fn load_remote(&self, url: &str) -> Result<Catalog> {
        if let Some(document) = self.cached_document(url) {
            match normalize(&document) {
                Ok(catalog) => {
                    info!(url, items = catalog.item_count(), "serving cached catalogue");
                    return Ok(catalog);
                }
                Err(e) => warn!(error = %e, "cached catalogue unusable, refetching"),
            }
        }

        let text = self.client.get_text(url).await?;
        let document: Value = serde_json::from_str(&text)?;
        let catalog = normalize(&document)?;
        info!(url, items = catalog.item_count(), "fetched catalogue");

        self.store_document(url, &document);
        Ok(catalog)
    }

    /// Valid cached document for `url`. Cache failures are logged and ignored.
    fn cached_document(&self, url: &str) -> Option<Value> {
        if !self.read_cache {
            return None;
        }
        let path = self.cache_path.as_deref()?;

        match cache::read_if_valid::<Value>(path, url, self.ttl) {
            Ok(hit) => {
                if hit.is_none() {
                    debug!(path = %path.display(), "no valid cache entry");
                }
                hit
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cache");
                None
            }
        }
    }

    fn store_document(&self, url: &str, document: &Value) {
        let Some(path) = self.cache_path.as_deref() else {
            return;
        };
        if let Err(e) = cache::write_cached(path, url, document) {
            warn!(error = %e, "failed to cache catalogue");
        }
    }
}

/// Normalize a parsed document, rejecting catalogues with no items.
fn normalize(document: &Value) -> Result<Catalog> {
    let catalog = Catalog::from_json(document)?;
    if catalog.is_empty() {
        return Err(EcoError::EmptyData);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::cache::{CachedData, DEFAULT_TTL};

    const ACME: &str = r#"{"DeFi":[{"name":"Acme","tags":["swap"]}]}"#;

    /// Serve one canned HTTP response per connection, counting requests.
    async fn serve(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/ecosystem.json"), hits)
    }

    fn loader(dir: &TempDir) -> (DataLoader, PathBuf) {
        let path = dir.path().join("catalog.json");
        let loader = DataLoader::new(
            CatalogClient::direct().unwrap(),
            Some(path.clone()),
            DEFAULT_TTL,
        );
        (loader, path)
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let (url, hits) = serve("HTTP/1.1 200 OK", ACME).await;
        let dir = TempDir::new().unwrap();
        let (loader, path) = loader(&dir);
        let source = Source::parse(&url);

        let first = loader.load(&source).await.unwrap();
        assert_eq!(first.categories[0].name, "DeFi");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(path.exists());

        let second = loader.load(&source).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_fetch() {
        let (url, hits) = serve("HTTP/1.1 200 OK", ACME).await;
        let dir = TempDir::new().unwrap();
        let (loader, path) = loader(&dir);

        let mut stale = CachedData::new(url.clone(), json!({"Old": [{"name": "Stale"}]}));
        stale.timestamp -= (DEFAULT_TTL.as_millis() as i64) + 1_000;
        cache::write_json(&path, &stale).unwrap();

        let catalog = loader.load(&Source::parse(&url)).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.categories[0].items[0].name, "Acme");

        let rewritten: CachedData<Value> = cache::read_cached(&path).unwrap().unwrap();
        assert!(rewritten.timestamp > stale.timestamp);
    }

    #[tokio::test]
    async fn test_bypass_cache_refetches() {
        let (url, hits) = serve("HTTP/1.1 200 OK", ACME).await;
        let dir = TempDir::new().unwrap();
        let (loader, _) = loader(&dir);
        let source = Source::parse(&url);

        loader.load(&source).await.unwrap();
        let loader = loader.bypass_cache(true);
        loader.load(&source).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let (url, _) = serve("HTTP/1.1 404 Not Found", "missing").await;
        let dir = TempDir::new().unwrap();
        let (loader, path) = loader(&dir);

        let err = loader.load(&Source::parse(&url)).await.unwrap_err();
        assert!(matches!(err, EcoError::Fetch { status: 404, .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (url, _) = serve("HTTP/1.1 200 OK", "{\"DeFi\": [").await;
        let dir = TempDir::new().unwrap();
        let (loader, _) = loader(&dir);

        let err = loader.load(&Source::parse(&url)).await.unwrap_err();
        assert!(matches!(err, EcoError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_document_is_not_cached() {
        let (url, _) = serve("HTTP/1.1 200 OK", "{}").await;
        let dir = TempDir::new().unwrap();
        let (loader, path) = loader(&dir);

        let err = loader.load(&Source::parse(&url)).await.unwrap_err();
        assert!(matches!(err, EcoError::EmptyData));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_not_fatal() {
        let (url, _) = serve("HTTP/1.1 200 OK", ACME).await;
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let loader = DataLoader::new(
            CatalogClient::direct().unwrap(),
            Some(blocker.join("catalog.json")),
            DEFAULT_TTL,
        );
        let catalog = loader.load(&Source::parse(&url)).await.unwrap();
        assert_eq!(catalog.item_count(), 1);
    }

    #[tokio::test]
    async fn test_local_file_source() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ecosystem.json");
        std::fs::write(&file, r#"[{"name": "Acme"}, {"name": "Keeper"}]"#).unwrap();

        let loader = DataLoader::new(CatalogClient::direct().unwrap(), None, DEFAULT_TTL);
        let catalog = loader.load(&Source::parse(file.to_str().unwrap())).await.unwrap();
        assert_eq!(catalog.item_count(), 2);

        let missing = Source::File(dir.path().join("missing.json"));
        let err = loader.load(&missing).await.unwrap_err();
        assert!(matches!(err, EcoError::Io(_)));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("HTTPS://example.test/e.json"),
            Source::Remote("HTTPS://example.test/e.json".to_string())
        );
        assert_eq!(
            Source::parse("ecosystem.json"),
            Source::File(PathBuf::from("ecosystem.json"))
        );
    }
}
