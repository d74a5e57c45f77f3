// src/fetch/mod.rs

use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::process::RawTable;

pub mod cache;

pub use cache::{Snapshot, TableCache};

/// Downloads the sheet export and keeps the last good copy for a while.
#[derive(Debug)]
pub struct SheetFetcher {
    client: Client,
    url: Url,
    cache: TableCache,
}

impl SheetFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let url = Url::parse(&config.sheet_url)
            .map_err(|e| Error::fetch(&config.sheet_url, format!("bad URL: {e}")))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::fetch(&config.sheet_url, e))?;
        Ok(Self {
            client,
            url,
            cache: TableCache::new(config.cache_ttl),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The last snapshot, even if it has expired.
    pub fn cached(&self) -> Option<&Snapshot> {
        self.cache.peek()
    }

    /// Return the cached table while it is fresh, otherwise download it again.
    ///
    /// `force_refresh` skips the cache. A failed download leaves the cache as it was.
    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    pub async fn fetch(&mut self, force_refresh: bool) -> Result<Snapshot> {
        let now = Instant::now();
        if !force_refresh {
            if let Some(hit) = self.cache.get_fresh(now) {
                debug!(age = ?hit.age(now), "cache hit");
                return Ok(hit.clone());
            }
        }

        let start = Instant::now();
        let table = match download_table(&self.client, &self.url).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "sheet download failed");
                return Err(e);
            }
        };
        info!(rows = table.len(), elapsed = ?start.elapsed(), "sheet downloaded");

        Ok(self.cache.store(Snapshot::new(table, Instant::now())).clone())
    }
}

async fn download_table(client: &Client, url: &Url) -> Result<RawTable> {
    let bytes = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| Error::fetch(url.as_str(), e))?
        .error_for_status()
        .map_err(|e| Error::fetch(url.as_str(), e))?
        .bytes()
        .await
        .map_err(|e| Error::fetch(url.as_str(), format!("reading body: {e}")))?;
    debug!(bytes = bytes.len(), "body received");
    decode_table(url.as_str(), &bytes)
}

/// Strict UTF-8 decode, then CSV parse.
pub fn decode_table(url: &str, body: &[u8]) -> Result<RawTable> {
    let text = std::str::from_utf8(body).map_err(|e| Error::fetch(url, format!("decode: {e}")))?;
    RawTable::from_csv_str(text).map_err(|e| Error::fetch(url, format!("csv: {e}")))
}
