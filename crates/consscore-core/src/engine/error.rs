use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use super::invoker::InvocationError;
use crate::core::io::rate4site::RateTableError;
use crate::orthology::OrthologyError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Ortholog retrieval failed: {source}")]
    Orthology {
        #[from]
        source: OrthologyError,
    },

    #[error("External program failed: {source}")]
    Invocation {
        #[from]
        source: InvocationError,
    },

    #[error("Failed to read conservation scores: {source}")]
    RateTable {
        #[from]
        source: RateTableError,
    },

    #[error("Failed to read input file '{path}': {source}", path = path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Working directory error at '{path}': {source}", path = path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
