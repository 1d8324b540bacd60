//! Core type definitions for RamFS

use serde::{Deserialize, Serialize};

/// Read/write flags carried by every node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
}

impl Permissions {
    pub const READ_WRITE: Permissions = Permissions {
        read: true,
        write: true,
    };
    pub const READ_ONLY: Permissions = Permissions {
        read: true,
        write: false,
    };

    pub const fn new(read: bool, write: bool) -> Self {
        Self { read, write }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::READ_WRITE
    }
}

/// Node timestamps, nanoseconds since the Unix epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTimes {
    pub created: i64,
    pub modified: i64,
}

impl NodeTimes {
    pub fn at(now: i64) -> Self {
        Self {
            created: now,
            modified: now,
        }
    }
}

/// A file entry, owned by its parent directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub content: Vec<u8>,
    pub permissions: Permissions,
    pub times: NodeTimes,
}

impl File {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata of a directory, detached from its children
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryInfo {
    pub name: String,
    pub permissions: Permissions,
    pub times: NodeTimes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Node information returned by `stat`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub kind: NodeKind,
    pub name: String,
    pub permissions: Permissions,
    pub times: NodeTimes,
    /// Content length for files, 0 for directories
    pub len: u64,
}

impl NodeInfo {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Listing of a directory, borrowed from the filesystem
#[derive(Clone, Debug)]
pub struct Listing<'a> {
    pub files: Vec<&'a File>,
    pub directories: Vec<&'a DirectoryInfo>,
}

impl Listing<'_> {
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn directory_names(&self) -> Vec<&str> {
        self.directories.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn to_owned_listing(&self) -> OwnedListing {
        OwnedListing {
            files: self.files.iter().map(|f| (*f).clone()).collect(),
            directories: self.directories.iter().map(|d| (*d).clone()).collect(),
        }
    }
}

/// Listing of a directory that outlives the lock it was taken under
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnedListing {
    pub files: Vec<File>,
    pub directories: Vec<DirectoryInfo>,
}

impl OwnedListing {
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn directory_names(&self) -> Vec<&str> {
        self.directories.iter().map(|d| d.name.as_str()).collect()
    }
}
