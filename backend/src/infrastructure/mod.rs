pub mod embeddings;
pub mod file_system;
