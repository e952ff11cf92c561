//! Semantic search over customer-support tickets.
//!
//! Tickets are embedded with a sentence-embedding model and stored in Qdrant;
//! queries run as hybrid (vector + keyword) searches inside Qdrant and are
//! served over HTTP.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
