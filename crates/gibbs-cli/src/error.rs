use gibbs625::core::io::ExpressionsLoadError;
use gibbs625::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    GibbsCore(#[from] EngineError),

    #[error(transparent)]
    Expressions(#[from] ExpressionsLoadError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Output file '{path}' already exists (pass --overwrite to replace it)", path = path.display())]
    WouldOverwrite { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
