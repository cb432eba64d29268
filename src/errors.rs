use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("the tree is empty")]
    EmptyTree,

    #[error("member not found: {0}")]
    NotFound(String),

    #[error("input not found: {path}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed command at line {line}: {reason}")]
    MalformedCommand { line: usize, reason: String },

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    /// Exit code for this error when it escapes to the process boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            TreeError::InputUnavailable { .. } => crate::exitcode::NOINPUT,
            TreeError::MalformedCommand { .. } => crate::exitcode::DATAERR,
            TreeError::Io(_) => crate::exitcode::IOERR,
            // Query-scoped errors; reaching main with one is unexpected
            TreeError::EmptyTree | TreeError::NotFound(_) => crate::exitcode::SOFTWARE,
        }
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
