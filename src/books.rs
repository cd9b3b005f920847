//! Book orchestration: cached content in, ordered chunks out.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, info};

use crate::error::{CorpusError, Result};
use crate::model::{BookSource, Provider, RecipeChunk};
use crate::splitters::StrategyRegistry;

/// Read access to fetched book content
pub trait BookCache {
    /// The cached content, or `None` when the book was never fetched.
    fn load(&self, source: &BookSource) -> Result<Option<String>>;

    /// Human-readable location of the cache entry, for error messages
    fn location(&self, source: &BookSource) -> String;
}

/// Book content on disk, `<root>/<provider>/<external_id>.html|.txt`
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, provider: Provider, external_id: &str) -> PathBuf {
        let extension = match provider {
            Provider::Gutenberg => "html",
            Provider::InternetArchive => "txt",
        };
        self.root
            .join(provider.as_str())
            .join(format!("{}.{}", external_id, extension))
    }

    /// Write `content` as the cache entry for `source`, replacing any
    /// previous one.
    pub fn store(&self, source: &BookSource, content: &str) -> Result<PathBuf> {
        let path = self.path_for(source.provider, &source.external_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}

impl BookCache for FileCache {
    fn load(&self, source: &BookSource) -> Result<Option<String>> {
        let path = self.path_for(source.provider, &source.external_id);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn location(&self, source: &BookSource) -> String {
        self.path_for(source.provider, &source.external_id)
            .display()
            .to_string()
    }
}

/// Which strategy a split should use
#[derive(Clone, Copy)]
pub enum StrategyChoice<'a> {
    /// The strategy stored on the source row
    Preferred,
    /// A registered strategy by name, overriding the stored one
    Named(&'a str),
    /// An ad-hoc function over the raw cached content
    Custom(&'a dyn Fn(&str) -> Vec<RecipeChunk>),
}

/// Splits cached books with the strategies of their provider family
pub struct BookSplitter<C: BookCache> {
    cache: C,
    gutenberg: StrategyRegistry,
    archive: StrategyRegistry,
}

impl<C: BookCache> BookSplitter<C> {
    /// A splitter over `cache` with every built-in strategy registered
    pub fn new(cache: C) -> Self {
        Self::with_registries(
            cache,
            StrategyRegistry::builtin(Provider::Gutenberg),
            StrategyRegistry::builtin(Provider::InternetArchive),
        )
    }

    pub fn with_registries(cache: C, gutenberg: StrategyRegistry, archive: StrategyRegistry) -> Self {
        Self {
            cache,
            gutenberg,
            archive,
        }
    }

    pub fn registry(&self, provider: Provider) -> &StrategyRegistry {
        match provider {
            Provider::Gutenberg => &self.gutenberg,
            Provider::InternetArchive => &self.archive,
        }
    }

    pub fn registry_mut(&mut self, provider: Provider) -> &mut StrategyRegistry {
        match provider {
            Provider::Gutenberg => &mut self.gutenberg,
            Provider::InternetArchive => &mut self.archive,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Split one book into chunks, in reading order.
    ///
    /// The cache is read first, so a book that was never fetched fails with
    /// [`CorpusError::MissingCache`] whatever the strategy choice. Without an
    /// explicit choice the source's stored strategy is used; a source without
    /// one fails with [`CorpusError::NoStrategyConfigured`].
    pub fn split(&self, source: &BookSource, choice: StrategyChoice<'_>) -> Result<Vec<RecipeChunk>> {
        let raw = self
            .cache
            .load(source)?
            .ok_or_else(|| CorpusError::MissingCache {
                book: source.external_id.clone(),
                path: self.cache.location(source),
            })?;
        debug!("Loaded {} bytes for {}", raw.len(), source.external_id);

        let registry = self.registry(source.provider);
        let (label, chunks) = match choice {
            StrategyChoice::Custom(split) => ("custom", split(&raw)),
            StrategyChoice::Named(name) => (name, registry.get(name)?.call(&raw)),
            StrategyChoice::Preferred => {
                let name = source
                    .split_strategy
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| CorpusError::NoStrategyConfigured {
                        book: source.external_id.clone(),
                        available: registry.available(),
                    })?;
                (name, registry.get(name)?.call(&raw))
            }
        };

        info!(
            "Split {} chunks from {} using {}",
            chunks.len(),
            source.external_id,
            label
        );
        Ok(chunks)
    }
}
