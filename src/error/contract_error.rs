use crate::validation::ViolationReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`ContractError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Setup mistakes: unknown groups, dangling references, bad config
    Configuration,
    /// The observed interaction does not satisfy the contract
    ContractMismatch,
    /// Failure reported by the HTTP client collaborator
    Transport,
    /// Failure while persisting contract documents
    Io,
}

impl ErrorKind {
    /// Returns the string representation of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::ContractMismatch => "CONTRACT_MISMATCH",
            ErrorKind::Transport => "TRANSPORT_ERROR",
            ErrorKind::Io => "IO_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("No contract document configured for group name '{0}'")]
    UnknownGroup(String),

    #[error("Operation '{method}' not found for path template '{path_template}'")]
    OperationNotFound {
        path_template: String,
        method: String,
    },

    #[error("Reference '{0}' does not resolve to a component")]
    DanglingReference(String),

    #[error("Reference '{0}' is circular or nested too deeply")]
    CircularReference(String),

    #[error("Contract file generation enabled but no file output root configured")]
    MissingOutputRoot,

    #[error("Invalid contract document: {0}")]
    InvalidDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Spec. not provided for URI '{uri}', method '{method}' and status code '{status_code}'")]
    SpecNotFound {
        uri: String,
        method: String,
        status_code: String,
    },

    #[error("Request does not match spec. {0}")]
    RequestDoesNotMatchSpec(ViolationReport),

    #[error("Response does not match spec. {0}")]
    ResponseDoesNotMatchSpec(ViolationReport),

    #[error("Status code '{actual}' does not match expected value '{expected}'")]
    StatusCodeMismatch { actual: String, expected: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Contract document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::UnknownGroup(_)
            | ContractError::OperationNotFound { .. }
            | ContractError::DanglingReference(_)
            | ContractError::CircularReference(_)
            | ContractError::MissingOutputRoot
            | ContractError::InvalidDocument(_)
            | ContractError::InvalidConfig(_) => ErrorKind::Configuration,
            ContractError::SpecNotFound { .. }
            | ContractError::RequestDoesNotMatchSpec(_)
            | ContractError::ResponseDoesNotMatchSpec(_)
            | ContractError::StatusCodeMismatch { .. } => ErrorKind::ContractMismatch,
            ContractError::Transport(_) => ErrorKind::Transport,
            ContractError::Io { .. } | ContractError::Serialization(_) => ErrorKind::Io,
        }
    }

    pub fn is_contract_mismatch(&self) -> bool {
        self.kind() == ErrorKind::ContractMismatch
    }

    /// Violations carried by request/response mismatches, empty otherwise
    pub fn violations(&self) -> &[crate::validation::Violation] {
        match self {
            ContractError::RequestDoesNotMatchSpec(report)
            | ContractError::ResponseDoesNotMatchSpec(report) => report.violations(),
            _ => &[],
        }
    }
}
