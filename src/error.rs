use crate::host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("no completion status configured")]
    NoCompletionStatus,

    #[error("an output folder must be chosen for this compilation")]
    OutputPathRequired,

    #[error("status already exists: {0}")]
    DuplicateStatus(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("no metadata field at position {0}")]
    UnknownField(usize),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("output folder not found: {0}")]
    OutputFolderNotFound(String),

    #[error("note not found: {0}")]
    ItemNotFound(String),

    #[error("nothing to compile: no notes marked '{0}'")]
    NothingToCompile(String),

    #[error("cannot move entry {from} to {to} in a list of {len}")]
    InvalidMove { from: usize, to: usize, len: usize },

    #[error("failed to save metadata for {path}: {source}")]
    MetadataWrite { path: String, source: HostError },

    #[error("failed to create compiled document {path}: {source}")]
    OutputCreate { path: String, source: HostError },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Broad classification of a [`FolioError`], used by callers to decide how to
/// present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NotFound,
    EmptyResult,
    Persistence,
    InvalidInput,
}

impl FolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FolioError::NoCompletionStatus
            | FolioError::OutputPathRequired
            | FolioError::DuplicateStatus(_)
            | FolioError::UnknownStatus(_)
            | FolioError::UnknownField(_) => ErrorKind::Configuration,
            FolioError::FolderNotFound(_)
            | FolioError::OutputFolderNotFound(_)
            | FolioError::ItemNotFound(_) => ErrorKind::NotFound,
            FolioError::NothingToCompile(_) => ErrorKind::EmptyResult,
            FolioError::InvalidMove { .. } => ErrorKind::InvalidInput,
            FolioError::Host(HostError::NotFound(_)) => ErrorKind::NotFound,
            FolioError::MetadataWrite { .. }
            | FolioError::OutputCreate { .. }
            | FolioError::Host(_)
            | FolioError::Settings(_)
            | FolioError::Db(_)
            | FolioError::Io(_)
            | FolioError::Other(_) => ErrorKind::Persistence,
        }
    }
}

pub type FolioResult<T> = Result<T, FolioError>;
