pub mod search;
pub mod ticket;

pub use search::{FilteredSearchResponse, HybridQuery, SearchHit, SearchResponse};
pub use ticket::{properties, TicketProperties, TicketRecord};
