pub mod load_service;
pub mod search_service;

pub use load_service::{LoadConfig, LoadError, LoadReport, LoadResult, LoadService};
pub use search_service::{SearchError, SearchResult, SearchService};
