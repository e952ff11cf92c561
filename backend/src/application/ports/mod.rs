pub mod text_embedder;
pub mod ticket_store;

pub use text_embedder::TextEmbedder;
pub use ticket_store::{FailedObject, TicketStore};
