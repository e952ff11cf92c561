/// Reading the ticket data file
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::application::dto::TicketRecord;

#[derive(Error, Debug)]
pub enum TicketFileError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a JSON array of tickets: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of ticket records from `path`
pub async fn read_ticket_file(path: &Path) -> Result<Vec<TicketRecord>, TicketFileError> {
    let bytes = fs::read(path).await.map_err(|source| TicketFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| TicketFileError::Json {
        path: path.to_path_buf(),
        source,
    })
}
