use thiserror::Error;

/// Errors that can occur while splitting books or exporting the dataset
#[derive(Error, Debug)]
pub enum CorpusError {
    /// No strategy is registered under the requested name
    #[error("Unknown split strategy '{name}'. Available strategies: {available}")]
    UnknownStrategy { name: String, available: String },

    /// Neither an explicit strategy nor a stored preference exists for the book
    #[error("No split strategy configured for book '{book}'. Pass one of: {available}")]
    NoStrategyConfigured { book: String, available: String },

    /// The book has not been fetched into the local cache yet
    #[error("No cached content for book '{book}' at {path}; run the fetch step first")]
    MissingCache { book: String, path: String },

    /// Export scope thresholds are malformed or contradictory
    #[error("Invalid export scope: {0}")]
    InvalidScope(String),

    /// Provider tag not recognised
    #[error("Unknown provider '{0}'. Expected 'gutenberg' or 'internet_archive'")]
    UnknownProvider(String),

    /// No source row for the given external identifier
    #[error("No source registered with external id '{0}'")]
    UnknownSource(String),

    /// Remote server answered with a non-success status
    #[error("Fetching {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },

    /// Failed to fetch book content
    #[error("Failed to fetch book: {0}")]
    Fetch(#[from] reqwest::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
