/// Result alias used throughout the connection crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by connection operations.
///
/// Every failure is synchronous: it belongs to the call that triggered
/// it, and no implicit rollback is performed on its behalf.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// `create_node` was called with an id that is already present.
    #[error("node already exists: {0}")]
    NodeExists(String),

    /// A node-level call targeted an id the backing store does not hold.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Malformed path usage or a backing-store failure during a file
    /// operation.
    #[error("file error at '{path}': {message}")]
    File { path: String, message: String },

    /// A node's metadata record exists but cannot be parsed. Never
    /// silently replaced with empty attributes.
    #[error("corrupt node metadata for '{nodeid}': {message}")]
    CorruptNode { nodeid: String, message: String },
}

impl Error {
    pub fn node_exists<S: Into<String>>(nodeid: S) -> Self {
        Error::NodeExists(nodeid.into())
    }

    pub fn unknown_node<S: Into<String>>(nodeid: S) -> Self {
        Error::UnknownNode(nodeid.into())
    }

    pub fn file<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Error::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Fold a backing-store I/O failure into the file error class.
    pub fn io<P: Into<String>>(path: P, err: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn corrupt_node<S: Into<String>, M: Into<String>>(nodeid: S, message: M) -> Self {
        Error::CorruptNode {
            nodeid: nodeid.into(),
            message: message.into(),
        }
    }

    /// True for the file error class, whatever produced it.
    pub fn is_file_error(&self) -> bool {
        matches!(self, Error::File { .. })
    }
}
