use std::io::{Read, Write};

use crate::error::Result;
use crate::value::Attrs;

/// Mode for [`Connection::open_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Open an existing file for reading.
    #[default]
    Read,
    /// Create the file if needed, truncate it, and open for writing.
    Write,
}

/// The storage connection contract.
///
/// A connection exclusively owns the backing representation of its
/// nodes; the calling layer owns the in-memory node objects and is
/// responsible for supplying consistent parent/child links in the
/// attributes it writes.
///
/// The operation model is synchronous and single-threaded: every call
/// blocks until the backing store has completed it, and instances are
/// not safe for concurrent use without external serialization.
pub trait Connection {
    /// Scoped stream over one file in a node's namespace. The stream
    /// releases its backing handle when dropped, on every exit path.
    type File: Read + Write;

    /// Persists a new node with the given attribute mapping and
    /// allocates backing storage for its file namespace.
    ///
    /// Fails with [`Error::NodeExists`](crate::Error::NodeExists) when
    /// `nodeid` is already present; the existing node is left intact.
    fn create_node(&mut self, nodeid: &str, attrs: &Attrs) -> Result<()>;

    /// Returns the attribute mapping last written for `nodeid`,
    /// value-for-value equal including nested structure and scalar
    /// kinds.
    fn read_node(&mut self, nodeid: &str) -> Result<Attrs>;

    /// Replaces the stored attribute mapping wholesale. The node's id
    /// and physical placement are not affected, even when `title`
    /// changes.
    fn update_node(&mut self, nodeid: &str, attrs: &Attrs) -> Result<()>;

    /// Removes the node together with its file namespace and the
    /// placement records of its descendants.
    fn delete_node(&mut self, nodeid: &str) -> Result<()>;

    /// True when `nodeid` is present. Never fails.
    fn has_node(&mut self, nodeid: &str) -> bool;

    /// The designated root node's id for this connection instance.
    fn get_rootid(&mut self) -> Result<String>;

    /// Opens a file within `nodeid`'s namespace.
    ///
    /// `relpath` must be a file path (no trailing separator). In write
    /// mode, missing intermediate directories are created.
    fn open_file(&mut self, nodeid: &str, relpath: &str, mode: OpenMode) -> Result<Self::File>;

    /// True iff an entry of the matching kind exists: a directory for
    /// a trailing-separator path, a file otherwise.
    fn has_file(&mut self, nodeid: &str, relpath: &str) -> bool;

    /// Removes a file, or recursively removes a directory and all of
    /// its contents.
    fn delete_file(&mut self, nodeid: &str, relpath: &str) -> Result<()>;

    /// Creates a directory. `relpath` must end with the separator.
    fn create_dir(&mut self, nodeid: &str, relpath: &str) -> Result<()>;

    /// Lists a directory's entries as full relative paths from the
    /// node's namespace root; directory entries keep their trailing
    /// separator.
    fn list_dir(&mut self, nodeid: &str, relpath: &str) -> Result<Vec<String>>;

    /// Relocates a file or directory, possibly across nodes. The
    /// source ceases to exist; the destination holds identical
    /// content. Implemented as copy-then-delete: the source is only
    /// removed after the copy succeeded.
    fn move_file(
        &mut self,
        src_nodeid: &str,
        src_relpath: &str,
        dst_nodeid: &str,
        dst_relpath: &str,
    ) -> Result<()>;

    /// Duplicates a file or directory; source and destination both
    /// exist afterward with identical content.
    fn copy_file(
        &mut self,
        src_nodeid: &str,
        src_relpath: &str,
        dst_nodeid: &str,
        dst_relpath: &str,
    ) -> Result<()>;
}
