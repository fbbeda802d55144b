use thiserror::Error;

use crate::config::ConfigError;
use crate::recording::domain::writer_lifecycle::{OpenError, WriteError};

/// Conditions that end a recording run. Everything recoverable is reported
/// as an [`IngestOutcome`](super::ingest_frame_use_case::IngestOutcome)
/// instead.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
