//! Historical cookbook corpus: per-book splitting heuristics that turn a
//! fetched book into ordered recipe chunks, and a deterministic exporter
//! that samples the extracted recipes into a versioned dataset.

pub mod books;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;
pub mod splitters;
pub mod store;

pub use books::{BookCache, BookSplitter, FileCache, StrategyChoice};
pub use builder::{DatasetExport, DatasetExportBuilder};
pub use config::{load_config, CorpusConfig, ExportConfig, FetchConfig};
pub use error::{CorpusError, Result};
pub use export::{export_dataset, ExportScope, Manifest, Selection};
pub use fetch::BookFetcher;
pub use model::{BookSource, NewSource, Provider, RecipeChunk};
pub use splitters::{Strategy, StrategyRegistry};
pub use store::Store;
