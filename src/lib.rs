pub mod config;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod output;
pub mod pipeline;
pub mod proxy;
pub mod query_builder;
pub mod record;
pub mod search_engine;

// Exporting types for convenience
pub use config::{Cli, OutputTarget, RunConfig};
pub use error::{Result, ScrapeError};
pub use extractor::{extract_fields, PageFields};
pub use proxy::{PageFetcher, ScraperApiClient};
pub use query_builder::{Locale, SearchQuery};
pub use record::SupplierRecord;
pub use search_engine::{SearchCandidate, SearchEngine};
