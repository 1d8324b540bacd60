//! In-memory namespace: directory tree plus path index

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::error::{FsError, FsResult};
use crate::path::{has_directory_suffix, join_path, TargetPath, ROOT};
use crate::{
    DirectoryInfo, File, FsConfig, FsOption, Listing, NodeInfo, NodeKind, NodeTimes, Permissions,
};

/// Internal directory ID, stable for the lifetime of the directory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct DirId(u64);

/// Directory node stored in the arena
#[derive(Clone, Debug)]
pub(crate) struct DirNode {
    pub info: DirectoryInfo,
    pub files: Vec<File>,
    pub directories: Vec<DirId>,
}

impl DirNode {
    fn new(name: &str, permissions: Permissions, now: i64) -> Self {
        Self {
            info: DirectoryInfo {
                name: name.to_string(),
                permissions,
                times: NodeTimes::at(now),
            },
            files: Vec::new(),
            directories: Vec::new(),
        }
    }

    fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// The in-memory filesystem.
///
/// The tree is authoritative: each directory is owned by exactly one parent's
/// `directories` list. `index` maps every canonical directory path to its ID
/// and is updated in the same call as the tree, including cascading removal of
/// whole subtrees.
pub struct RamFs {
    clock: Arc<dyn Clock>,
    nodes: HashMap<DirId, DirNode>,
    index: HashMap<String, DirId>,
    root_id: DirId,
    next_dir_id: u64,
}

impl RamFs {
    pub fn new(config: FsConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_options(options: &[FsOption]) -> Self {
        Self::new(FsConfig::from_options(options))
    }

    pub fn with_clock(config: FsConfig, clock: Arc<dyn Clock>) -> Self {
        let root_id = DirId(0);
        let permissions = config.root_permissions();
        let root = DirNode::new(ROOT, permissions, clock.now_nanos());

        let mut fs = Self {
            clock,
            nodes: HashMap::new(),
            index: HashMap::new(),
            root_id,
            next_dir_id: 1,
        };
        fs.nodes.insert(root_id, root);
        fs.index.insert(ROOT.to_string(), root_id);

        debug!(
            "Created ramfs root (read: {}, write: {})",
            permissions.read, permissions.write
        );
        fs
    }

    fn allocate_dir_id(&mut self) -> DirId {
        let id = DirId(self.next_dir_id);
        self.next_dir_id += 1;
        id
    }

    fn now(&self) -> i64 {
        self.clock.now_nanos()
    }

    /// Look up a normalized directory path in the index
    fn lookup(&self, path: &str) -> Option<DirId> {
        let id = self.index.get(path).copied();
        trace!("Index lookup {} -> {:?}", path, id);
        id
    }

    fn node(&self, id: DirId) -> FsResult<&DirNode> {
        self.nodes.get(&id).ok_or(FsError::DirectoryNotFound)
    }

    fn node_mut(&mut self, id: DirId) -> FsResult<&mut DirNode> {
        self.nodes.get_mut(&id).ok_or(FsError::DirectoryNotFound)
    }

    /// Subdirectory of `parent` named `name`
    fn child_directory(&self, parent: &DirNode, name: &str) -> Option<DirId> {
        parent
            .directories
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.info.name == name))
    }

    /// Drop a directory and everything below it from both the arena and the index.
    /// The caller detaches `dir_id` from its parent.
    fn remove_subtree(&mut self, dir_id: DirId, path: String) -> usize {
        let mut pending = vec![(dir_id, path)];
        let mut removed = 0;

        while let Some((id, path)) = pending.pop() {
            if self.index.get(&path) == Some(&id) {
                self.index.remove(&path);
            }
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            for child_id in node.directories {
                if let Some(child) = self.nodes.get(&child_id) {
                    pending.push((child_id, join_path(&path, &child.info.name)));
                }
            }
            removed += 1;
        }

        removed
    }

    // Directory operations

    /// Create `path`, replacing a writable directory of the same name with a fresh one.
    pub fn mkdir(&mut self, path: &str) -> FsResult<()> {
        if path.is_empty() || path == ROOT {
            return Err(FsError::NoParentDirectory);
        }

        let target = TargetPath::parse(path);
        let name = target.name.as_deref().ok_or(FsError::NoParentDirectory)?;
        let parent_id = self
            .lookup(&target.parent)
            .ok_or(FsError::NoParentDirectory)?;

        let parent = self.node(parent_id)?;
        if !parent.info.permissions.write {
            return Err(FsError::NoWritePermission);
        }

        let existing = self.child_directory(parent, name);
        if let Some(existing_id) = existing {
            if !self.node(existing_id)?.info.permissions.write {
                return Err(FsError::NoWritePermission);
            }
        }

        // Validation is complete; nothing below can fail.
        if let Some(existing_id) = existing {
            self.node_mut(parent_id)?
                .directories
                .retain(|id| *id != existing_id);
            let removed = self.remove_subtree(existing_id, target.path.clone());
            debug!("Replacing directory {} ({} directories dropped)", target.path, removed);
        }

        let now = self.now();
        let dir_id = self.allocate_dir_id();
        self.nodes
            .insert(dir_id, DirNode::new(name, Permissions::READ_WRITE, now));

        let parent = self.node_mut(parent_id)?;
        parent.directories.push(dir_id);
        parent.info.times.modified = now;

        self.index.insert(target.path.clone(), dir_id);
        debug!("Created directory {}", target.path);
        Ok(())
    }

    /// List the files and subdirectories of a directory, in insertion order.
    ///
    /// Only existence is checked; the directory's read flag does not apply.
    pub fn ls(&self, path: &str) -> FsResult<Listing<'_>> {
        let target = TargetPath::parse(path);
        let dir_id = self
            .lookup(&target.path)
            .ok_or(FsError::DirectoryNotFound)?;
        let node = self.node(dir_id)?;

        Ok(Listing {
            files: node.files.iter().collect(),
            directories: node
                .directories
                .iter()
                .filter_map(|id| self.nodes.get(id).map(|n| &n.info))
                .collect(),
        })
    }

    // File operations

    /// Create or fully replace a file.
    pub fn write_file(&mut self, path: &str, content: impl Into<Vec<u8>>) -> FsResult<()> {
        let target = TargetPath::parse(path);
        let name = target.name.as_deref().ok_or(FsError::NoParentDirectory)?;
        let parent_id = self
            .lookup(&target.parent)
            .ok_or(FsError::NoParentDirectory)?;
        let now = self.now();

        let parent = self.node_mut(parent_id)?;
        if !parent.info.permissions.write {
            return Err(FsError::NoWritePermission);
        }
        if parent.file(name).is_some_and(|f| !f.permissions.write) {
            return Err(FsError::NoWritePermission);
        }

        let content = content.into();
        let len = content.len();
        parent.files.retain(|f| f.name != name);
        parent.files.push(File {
            name: name.to_string(),
            content,
            permissions: Permissions::READ_WRITE,
            times: NodeTimes::at(now),
        });
        parent.info.times.modified = now;

        debug!("Wrote file {} ({} bytes)", target.path, len);
        Ok(())
    }

    /// Full contents of a file.
    pub fn file_get_contents(&self, path: &str) -> FsResult<Vec<u8>> {
        let target = TargetPath::parse(path);
        let parent_id = self
            .lookup(&target.parent)
            .ok_or(FsError::NoParentDirectory)?;

        let parent = self.node(parent_id)?;
        if !parent.info.permissions.read {
            return Err(FsError::NoReadPermission);
        }

        let name = target.name.as_deref().ok_or(FsError::FileNotFound)?;
        let file = parent.file(name).ok_or(FsError::FileNotFound)?;
        if !file.permissions.read {
            return Err(FsError::NoReadPermission);
        }

        Ok(file.content.clone())
    }

    // Removal

    /// Remove a file, or a directory and its whole subtree when `path` ends with `/`.
    pub fn rm(&mut self, path: &str) -> FsResult<()> {
        let target = TargetPath::parse(path);
        if has_directory_suffix(path) {
            self.remove_directory(&target)
        } else {
            self.remove_file(&target)
        }
    }

    fn remove_directory(&mut self, target: &TargetPath) -> FsResult<()> {
        let dir_id = self
            .lookup(&target.path)
            .ok_or(FsError::DirectoryNotFound)?;
        if !self.node(dir_id)?.info.permissions.write {
            return Err(FsError::NoWritePermission);
        }

        // Root has no parent entry to detach from.
        if target.is_root() {
            return Err(FsError::DirectoryNotFound);
        }
        let parent_id = self
            .lookup(&target.parent)
            .ok_or(FsError::DirectoryNotFound)?;
        if !self.node(parent_id)?.info.permissions.write {
            return Err(FsError::NoWritePermission);
        }

        let now = self.now();
        let parent = self.node_mut(parent_id)?;
        parent.directories.retain(|id| *id != dir_id);
        parent.info.times.modified = now;

        let removed = self.remove_subtree(dir_id, target.path.clone());
        debug!("Removed directory {} ({} directories dropped)", target.path, removed);
        Ok(())
    }

    fn remove_file(&mut self, target: &TargetPath) -> FsResult<()> {
        let parent_id = self.lookup(&target.parent).ok_or(FsError::FileNotFound)?;
        let now = self.now();

        let parent = self.node_mut(parent_id)?;
        if !parent.info.permissions.write {
            return Err(FsError::NoWritePermission);
        }

        let name = target.name.as_deref().ok_or(FsError::FileNotFound)?;
        let pos = parent
            .files
            .iter()
            .position(|f| f.name == name)
            .ok_or(FsError::FileNotFound)?;
        if !parent.files[pos].permissions.write {
            return Err(FsError::NoWritePermission);
        }

        parent.files.remove(pos);
        parent.info.times.modified = now;

        debug!("Removed file {}", target.path);
        Ok(())
    }

    // Metadata operations

    /// Replace the read/write flags of a node.
    ///
    /// A trailing `/` (or the root path) selects a directory, anything else a file.
    /// The node's own flags are not consulted, so a locked node can be unlocked again.
    pub fn set_permissions(&mut self, path: &str, permissions: Permissions) -> FsResult<()> {
        let target = TargetPath::parse(path);
        let now = self.now();

        if has_directory_suffix(path) || target.is_root() {
            let dir_id = self
                .lookup(&target.path)
                .ok_or(FsError::DirectoryNotFound)?;
            let info = &mut self.node_mut(dir_id)?.info;
            info.permissions = permissions;
            info.times.modified = now;
        } else {
            let parent_id = self.lookup(&target.parent).ok_or(FsError::FileNotFound)?;
            let name = target.name.as_deref().ok_or(FsError::FileNotFound)?;
            let file = self
                .node_mut(parent_id)?
                .files
                .iter_mut()
                .find(|f| f.name == name)
                .ok_or(FsError::FileNotFound)?;
            file.permissions = permissions;
            file.times.modified = now;
        }

        debug!(
            "Set permissions of {} (read: {}, write: {})",
            target.path, permissions.read, permissions.write
        );
        Ok(())
    }

    /// Metadata of the node at `path`, directories taking precedence over files.
    pub fn stat(&self, path: &str) -> FsResult<NodeInfo> {
        let target = TargetPath::parse(path);

        if let Some(dir_id) = self.lookup(&target.path) {
            let info = &self.node(dir_id)?.info;
            return Ok(NodeInfo {
                kind: NodeKind::Directory,
                name: info.name.clone(),
                permissions: info.permissions,
                times: info.times,
                len: 0,
            });
        }

        let parent_id = self.lookup(&target.parent).ok_or(FsError::FileNotFound)?;
        let name = target.name.as_deref().ok_or(FsError::FileNotFound)?;
        let file = self.node(parent_id)?.file(name).ok_or(FsError::FileNotFound)?;
        Ok(NodeInfo {
            kind: NodeKind::File,
            name: file.name.clone(),
            permissions: file.permissions,
            times: file.times,
            len: file.content.len() as u64,
        })
    }

    pub fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    pub fn root(&self) -> &DirectoryInfo {
        // The root node is inserted at construction and never removed.
        &self.nodes[&self.root_id].info
    }

    /// Number of directories in the index, root included
    pub fn directory_count(&self) -> usize {
        self.index.len()
    }
}

impl Default for RamFs {
    fn default() -> Self {
        Self::new(FsConfig::default())
    }
}

impl fmt::Debug for RamFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RamFs")
            .field("root", self.root())
            .field("directories", &self.index.len())
            .finish_non_exhaustive()
    }
}
