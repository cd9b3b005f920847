//! Downloading book content into the local cache.
//!
//! Fetching is a separate step from splitting: [`crate::books::BookSplitter`]
//! only ever reads the cache.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;

use crate::books::FileCache;
use crate::config::FetchConfig;
use crate::error::{CorpusError, Result};
use crate::model::{BookSource, Provider};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; CookbookCorpus/0.4)";

pub struct BookFetcher {
    client: Client,
    gutenberg_base_url: String,
    archive_base_url: String,
}

impl BookFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            gutenberg_base_url: config.gutenberg_base_url.trim_end_matches('/').to_string(),
            archive_base_url: config.archive_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Download URL of a book's text or HTML edition
    pub fn url_for(&self, provider: Provider, external_id: &str) -> String {
        match provider {
            Provider::Gutenberg => format!(
                "{}/cache/epub/{id}/pg{id}-images.html",
                self.gutenberg_base_url,
                id = external_id
            ),
            Provider::InternetArchive => format!(
                "{}/download/{id}/{id}_djvu.txt",
                self.archive_base_url,
                id = external_id
            ),
        }
    }

    pub fn fetch(&self, provider: Provider, external_id: &str) -> Result<String> {
        let url = self.url_for(provider, external_id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CorpusError::FetchStatus {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }

    /// Fetch a source and write it to the cache, returning the cached path.
    pub fn fetch_into(&self, source: &BookSource, cache: &FileCache) -> Result<PathBuf> {
        let content = self.fetch(source.provider, &source.external_id)?;
        let path = cache.store(source, &content)?;
        info!(
            "Cached {} ({} bytes) at {}",
            source.external_id,
            content.len(),
            path.display()
        );
        Ok(path)
    }
}
