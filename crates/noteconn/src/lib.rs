//! Backend-independent contract for note-graph storage connections.
//!
//! A connection maps an abstract node/file model onto a backing store:
//! each node carries a dynamically-typed attribute mapping plus a
//! private tree of files and directories. This crate defines the
//! contract only; concrete backends (see the `notefs` crate) implement
//! it.
//!
//! Within a node's file namespace, relative paths use `/` and a
//! trailing `/` marks a directory path. The trailing separator is the
//! sole source of truth for the file/directory distinction - it is
//! never inferred from what the backing store currently holds.

/// Attribute codec: lossless mapping between attribute maps and the
/// on-disk metadata record.
pub mod codec;

/// The `Connection` trait and file open modes.
pub mod conn;

/// Error taxonomy shared by all backends.
pub mod error;

/// Pure helpers for relative path strings.
pub mod path;

/// Dynamically-typed attribute values.
pub mod value;

pub use conn::{Connection, OpenMode};
pub use error::{Error, Result};
pub use value::{Attrs, Value};
