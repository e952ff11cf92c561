pub mod dto;
pub mod ports;
pub mod services;

pub use dto::{
    FilteredSearchResponse, HybridQuery, SearchHit, SearchResponse, TicketProperties,
    TicketRecord,
};
pub use ports::{FailedObject, TextEmbedder, TicketStore};
pub use services::{
    LoadConfig, LoadError, LoadReport, LoadService, SearchError, SearchService,
};
