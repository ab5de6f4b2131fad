//! Error types you might see while building a catalog or changing a disk

use thiserror::Error;

/// Errors that abort a catalog request or a disk operation
#[derive(Error, Debug)]
pub enum CatalogError {
    /// the remote tool rejected a command; the message is its own text
    #[error("{message}")]
    CommandFailed { command: String, message: String },

    /// control socket closed before the final response
    #[error("control socket closed before the final response")]
    Disconnected,

    /// no response within the configured timeout
    #[error("no response within the configured timeout: {0:?}")]
    Timeout(String),

    /// control socket io error
    #[error("control socket io error: {0}")]
    Io(#[from] std::io::Error),

    /// json error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// no such experiment topology
    #[error("experiment not found: {0:?}")]
    TopologyNotFound(String),

    /// a stored topology document could not be parsed
    #[error("unable to parse topology {name:?}: {source}")]
    InvalidTopology {
        name: String,
        source: serde_json::Error,
    },

    /// disk path can't be passed on a remote command line
    #[error("invalid disk path: {0:?}")]
    InvalidDiskPath(String),

    /// can't determine the managed storage root
    #[error("can't determine the managed storage root")]
    NoDefaultFilesDir,
}

impl CatalogError {
    /// Is this a failure to reach or talk to the remote command executor?
    ///
    /// These are the errors that abort a catalog build because the cluster
    /// could not be observed completely.
    pub fn is_command_error(&self) -> bool {
        match self {
            CatalogError::CommandFailed { .. }
            | CatalogError::Disconnected
            | CatalogError::Timeout(_)
            | CatalogError::Io(_)
            | CatalogError::Json(_) => true,
            _ => false,
        }
    }

    /// Is this a lookup for a workload that doesn't exist?
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::TopologyNotFound(_))
    }
}

/// A single malformed field in a tool response row
///
/// These never abort anything. The field falls back to a safe default and
/// the error is logged.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum FieldError {
    #[error("field {field:?} has unparseable value {value:?}")]
    Malformed { field: &'static str, value: String },
}
