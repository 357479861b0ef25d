use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use noteconn::path as relpath;
use noteconn::{Attrs, Connection, Error, OpenMode, Result, Value, codec};

use crate::index::PathIndex;
use crate::layout;
use crate::naming;

/// Filesystem-backed storage connection.
///
/// One instance exclusively owns the backing tree under its root
/// directory. Single-threaded: callers needing concurrent access must
/// serialize their own calls.
pub struct NotebookFs {
    root: PathBuf,
    rootid: Option<String>,
    index: PathIndex,
}

impl NotebookFs {
    /// Opens (or creates) the backing root directory and recovers the
    /// root claim from an existing metadata record, if present.
    pub fn connect<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| Error::io(root.display().to_string(), e))?;
        let mut conn = NotebookFs {
            root,
            rootid: None,
            index: PathIndex::new(),
        };
        conn.load_root_claim()?;
        let at = conn.root.display().to_string();
        diagnostics::log_info!("connected notebook at {path}", path: at);
        Ok(conn)
    }

    /// The backing root directory this connection is bound to.
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn load_root_claim(&mut self) -> Result<()> {
        let meta = self.root.join(layout::NODE_META);
        if !meta.is_file() {
            return Ok(());
        }
        let text =
            fs::read_to_string(&meta).map_err(|e| Error::io(meta.display().to_string(), e))?;
        let attrs =
            codec::decode(&text).map_err(|e| Error::corrupt_node("(root)", e.to_string()))?;
        if let Some(id) = attrs.get("nodeid").and_then(Value::as_str) {
            self.index.insert(id, self.root.clone());
            self.rootid = Some(id.to_string());
        }
        Ok(())
    }

    /// Resolves a node id to its backing directory.
    ///
    /// Order: index hit, root claim, orphan probe (O(1), keyed by the
    /// id alone), then a lazy walk of the tree that fills the index
    /// from the metadata records it passes.
    fn node_dir(&mut self, nodeid: &str) -> Result<PathBuf> {
        if let Some(p) = self.index.get(nodeid) {
            return Ok(p.clone());
        }
        if self.rootid.as_deref() == Some(nodeid) {
            self.index.insert(nodeid, self.root.clone());
            return Ok(self.root.clone());
        }
        let orphan = layout::orphan_dir(&self.root, nodeid);
        if orphan.join(layout::NODE_META).is_file() {
            self.index.insert(nodeid, orphan.clone());
            return Ok(orphan);
        }
        self.scan_for(nodeid)
            .ok_or_else(|| Error::unknown_node(nodeid))
    }

    fn scan_for(&mut self, nodeid: &str) -> Option<PathBuf> {
        let target = nodeid;
        diagnostics::log_debug!("index miss, walking tree for {nodeid}", nodeid: target);
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let meta = dir.join(layout::NODE_META);
            if dir != self.root && meta.is_file() {
                if let Ok(text) = fs::read_to_string(&meta) {
                    match codec::decode(&text) {
                        Ok(attrs) => {
                            if let Some(id) = attrs.get("nodeid").and_then(Value::as_str) {
                                self.index.insert(id, dir.clone());
                                if id == nodeid {
                                    return Some(dir);
                                }
                            }
                        }
                        Err(_) => {
                            let at = dir.display().to_string();
                            diagnostics::log_warn!(
                                "skipping unreadable metadata record at {path}",
                                path: at
                            );
                        }
                    }
                }
            }
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_dir() {
                    stack.push(p);
                }
            }
        }
        None
    }

    fn parent_of(attrs: &Attrs) -> Option<&str> {
        attrs
            .get("parentids")
            .and_then(Value::as_list)
            .and_then(|ids| ids.first())
            .and_then(Value::as_str)
    }

    /// Decides where a new node lives. Returns the created directory
    /// and whether it claims the connection root.
    fn place_node(&mut self, nodeid: &str, attrs: &Attrs) -> Result<(PathBuf, bool)> {
        match Self::parent_of(attrs) {
            None if self.rootid.is_none() => Ok((self.root.clone(), true)),
            parent => {
                if let Some(pid) = parent {
                    match self.node_dir(pid) {
                        Ok(parent_dir) => {
                            let dir = self.new_child_dir(&parent_dir, attrs)?;
                            return Ok((dir, false));
                        }
                        // Unresolvable parent: fall through to the
                        // orphan area rather than failing the create.
                        Err(Error::UnknownNode(_)) => {}
                        Err(e) => return Err(e),
                    }
                }
                let dir = layout::orphan_dir(&self.root, nodeid);
                fs::create_dir_all(&dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
                let id = nodeid;
                diagnostics::log_debug!("orphan placement for {nodeid}", nodeid: id);
                Ok((dir, false))
            }
        }
    }

    /// Creates a title-derived, sibling-unique directory under the
    /// parent. The name is chosen here, once; later title edits do not
    /// rename it.
    fn new_child_dir(&self, parent_dir: &Path, attrs: &Attrs) -> Result<PathBuf> {
        let title = attrs.get("title").and_then(Value::as_str).unwrap_or("");
        let base = naming::sanitize_title(title);
        let taken = sibling_names(parent_dir)?;
        let name = naming::unique_name(&base, &taken);
        let dir = parent_dir.join(name);
        fs::create_dir(&dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
        Ok(dir)
    }

    fn write_meta(&self, dir: &Path, attrs: &Attrs) -> Result<()> {
        let meta = dir.join(layout::NODE_META);
        let text = codec::encode(attrs).map_err(|e| {
            Error::file(
                meta.display().to_string(),
                format!("failed to encode metadata: {e}"),
            )
        })?;
        fs::write(&meta, text).map_err(|e| Error::io(meta.display().to_string(), e))
    }

    /// Resolves a relative path within a node's namespace to an
    /// absolute backing path. Rejects components that would escape it.
    fn file_abs(&mut self, nodeid: &str, rel: &str) -> Result<PathBuf> {
        let mut abs = self.node_dir(nodeid)?;
        for comp in relpath::components(rel) {
            if comp == "." || comp == ".." {
                return Err(Error::file(rel, "path escapes the node's namespace"));
            }
            abs.push(comp);
        }
        Ok(abs)
    }

    /// Copy, then delete the source only after the copy succeeded.
    fn transfer(
        &mut self,
        src_nodeid: &str,
        src_rel: &str,
        dst_nodeid: &str,
        dst_rel: &str,
        keep_source: bool,
    ) -> Result<()> {
        if src_rel.is_empty() || dst_rel.is_empty() {
            return Err(Error::file(src_rel, "empty path"));
        }
        if relpath::is_dir_path(src_rel) != relpath::is_dir_path(dst_rel) {
            return Err(Error::file(
                dst_rel,
                "source and destination must be the same kind",
            ));
        }
        let src_abs = self.file_abs(src_nodeid, src_rel)?;
        let dst_abs = self.file_abs(dst_nodeid, dst_rel)?;
        if relpath::is_dir_path(src_rel) {
            if !src_abs.is_dir() {
                return Err(Error::file(src_rel, "not a directory"));
            }
            copy_tree(&src_abs, &dst_abs)?;
        } else {
            if !src_abs.is_file() {
                return Err(Error::file(src_rel, "not a file"));
            }
            if let Some(parent) = dst_abs.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(dst_rel, e))?;
            }
            fs::copy(&src_abs, &dst_abs).map_err(|e| Error::io(dst_rel, e))?;
        }
        if !keep_source {
            if relpath::is_dir_path(src_rel) {
                fs::remove_dir_all(&src_abs).map_err(|e| Error::io(src_rel, e))?;
                self.index.remove_subtree(&src_abs);
            } else {
                fs::remove_file(&src_abs).map_err(|e| Error::io(src_rel, e))?;
            }
        }
        Ok(())
    }
}

impl Connection for NotebookFs {
    type File = fs::File;

    fn create_node(&mut self, nodeid: &str, attrs: &Attrs) -> Result<()> {
        if self.has_node(nodeid) {
            return Err(Error::node_exists(nodeid));
        }
        let (dir, claims_root) = self.place_node(nodeid, attrs)?;
        self.write_meta(&dir, attrs)?;
        self.index.insert(nodeid, dir.clone());
        if claims_root {
            self.rootid = Some(nodeid.to_string());
        }
        // Page nodes get a readable body before the caller writes one.
        if attrs.get("content_type").and_then(Value::as_str) == Some(layout::PAGE_CONTENT_TYPE) {
            let page = dir.join(layout::PAGE_FILE);
            if !page.exists() {
                fs::write(&page, layout::BLANK_PAGE)
                    .map_err(|e| Error::io(page.display().to_string(), e))?;
            }
        }
        let id = nodeid;
        let at = dir.display().to_string();
        diagnostics::log_info!("created node {nodeid} at {path}", nodeid: id, path: at);
        Ok(())
    }

    fn read_node(&mut self, nodeid: &str) -> Result<Attrs> {
        let dir = self.node_dir(nodeid)?;
        let meta = dir.join(layout::NODE_META);
        let text = match fs::read_to_string(&meta) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Stale index entry.
                self.index.remove(nodeid);
                return Err(Error::unknown_node(nodeid));
            }
            Err(e) => return Err(Error::io(meta.display().to_string(), e)),
        };
        codec::decode(&text).map_err(|e| Error::corrupt_node(nodeid, e.to_string()))
    }

    fn update_node(&mut self, nodeid: &str, attrs: &Attrs) -> Result<()> {
        let dir = self.node_dir(nodeid)?;
        if !dir.join(layout::NODE_META).is_file() {
            self.index.remove(nodeid);
            return Err(Error::unknown_node(nodeid));
        }
        // Placement is not re-derived, even when the title changed.
        self.write_meta(&dir, attrs)
    }

    fn delete_node(&mut self, nodeid: &str) -> Result<()> {
        let dir = self.node_dir(nodeid)?;
        if dir == self.root {
            // The root directory is the connection address; empty it
            // but leave it in place.
            clear_dir(&self.root)?;
            self.rootid = None;
            self.index.clear();
        } else {
            fs::remove_dir_all(&dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
            self.index.remove_subtree(&dir);
        }
        let id = nodeid;
        diagnostics::log_info!("deleted node {nodeid}", nodeid: id);
        Ok(())
    }

    fn has_node(&mut self, nodeid: &str) -> bool {
        self.node_dir(nodeid).is_ok()
    }

    fn get_rootid(&mut self) -> Result<String> {
        self.rootid
            .clone()
            .ok_or_else(|| Error::unknown_node("(root)"))
    }

    fn open_file(&mut self, nodeid: &str, rel: &str, mode: OpenMode) -> Result<fs::File> {
        if rel.is_empty() || relpath::is_dir_path(rel) {
            return Err(Error::file(rel, "expected a file path"));
        }
        let abs = self.file_abs(nodeid, rel)?;
        match mode {
            OpenMode::Read => fs::File::open(&abs).map_err(|e| Error::io(rel, e)),
            OpenMode::Write => {
                if let Some(parent) = abs.parent() {
                    fs::create_dir_all(parent).map_err(|e| Error::io(rel, e))?;
                }
                fs::File::create(&abs).map_err(|e| Error::io(rel, e))
            }
        }
    }

    fn has_file(&mut self, nodeid: &str, rel: &str) -> bool {
        match self.file_abs(nodeid, rel) {
            Ok(abs) if relpath::is_dir_path(rel) => abs.is_dir(),
            Ok(abs) => abs.is_file(),
            Err(_) => false,
        }
    }

    fn delete_file(&mut self, nodeid: &str, rel: &str) -> Result<()> {
        let abs = self.file_abs(nodeid, rel)?;
        if relpath::is_dir_path(rel) {
            if !abs.is_dir() {
                return Err(Error::file(rel, "not a directory"));
            }
            fs::remove_dir_all(&abs).map_err(|e| Error::io(rel, e))?;
            // Nodes placed inside the removed tree lose their placement.
            self.index.remove_subtree(&abs);
        } else {
            if !abs.is_file() {
                return Err(Error::file(rel, "not a file"));
            }
            fs::remove_file(&abs).map_err(|e| Error::io(rel, e))?;
        }
        Ok(())
    }

    fn create_dir(&mut self, nodeid: &str, rel: &str) -> Result<()> {
        if !relpath::is_dir_path(rel) {
            return Err(Error::file(rel, "directory paths must end with the separator"));
        }
        let abs = self.file_abs(nodeid, rel)?;
        fs::create_dir_all(&abs).map_err(|e| Error::io(rel, e))
    }

    fn list_dir(&mut self, nodeid: &str, rel: &str) -> Result<Vec<String>> {
        if !rel.is_empty() && !relpath::is_dir_path(rel) {
            return Err(Error::file(rel, "not a directory path"));
        }
        let abs = self.file_abs(nodeid, rel)?;
        if !abs.is_dir() {
            return Err(Error::file(rel, "not a directory"));
        }
        let entries = fs::read_dir(&abs).map_err(|e| Error::io(rel, e))?;
        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(rel, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == layout::NODE_META {
                continue;
            }
            if abs == self.root && name == layout::ORPHANS_DIR {
                continue;
            }
            let full = format!("{rel}{name}");
            if entry.path().is_dir() {
                listing.push(format!("{full}{}", relpath::SEP));
            } else {
                listing.push(full);
            }
        }
        Ok(listing)
    }

    fn move_file(
        &mut self,
        src_nodeid: &str,
        src_relpath: &str,
        dst_nodeid: &str,
        dst_relpath: &str,
    ) -> Result<()> {
        self.transfer(src_nodeid, src_relpath, dst_nodeid, dst_relpath, false)?;
        let from = src_relpath;
        let to = dst_relpath;
        diagnostics::log_debug!("moved {src} to {dst}", src: from, dst: to);
        Ok(())
    }

    fn copy_file(
        &mut self,
        src_nodeid: &str,
        src_relpath: &str,
        dst_nodeid: &str,
        dst_relpath: &str,
    ) -> Result<()> {
        self.transfer(src_nodeid, src_relpath, dst_nodeid, dst_relpath, true)
    }
}

fn sibling_names(dir: &Path) -> Result<HashSet<String>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
    let mut names = HashSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir.display().to_string(), e))?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

fn clear_dir(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir.display().to_string(), e))?;
        let p = entry.path();
        let removed = if p.is_dir() {
            fs::remove_dir_all(&p)
        } else {
            fs::remove_file(&p)
        };
        removed.map_err(|e| Error::io(p.display().to_string(), e))?;
    }
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| Error::io(dst.display().to_string(), e))?;
    let entries = fs::read_dir(src).map_err(|e| Error::io(src.display().to_string(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(src.display().to_string(), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io(to.display().to_string(), e))?;
        }
    }
    Ok(())
}
