use std::path::{Path, PathBuf};

/// Per-node metadata record, stored at the top of every node directory.
pub const NODE_META: &str = "node.json";

/// Orphan area, relative to the connection root.
pub const ORPHANS_DIR: &str = "__orphans__";

/// Content type whose nodes get a default page body at creation.
pub const PAGE_CONTENT_TYPE: &str = "text/xhtml+xml";

/// Name of the default page body within a node's namespace.
pub const PAGE_FILE: &str = "page.html";

/// Body written for newly created page nodes.
pub const BLANK_PAGE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<body></body>\n</html>\n";

/// Computes the orphan directory for a node id.
///
/// Ids longer than two characters fan out on their first two
/// characters; shorter ids are a single leaf. The location depends on
/// nothing but the id, so it is deterministic and collision-free.
pub fn orphan_dir(root: &Path, nodeid: &str) -> PathBuf {
    match nodeid.char_indices().nth(2) {
        Some((fan, _)) => {
            let (prefix, rest) = nodeid.split_at(fan);
            root.join(ORPHANS_DIR).join(prefix).join(rest)
        }
        None => root.join(ORPHANS_DIR).join(nodeid),
    }
}
