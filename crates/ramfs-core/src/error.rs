//! Error types for RamFS Core

/// Core filesystem error type
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("you can not create a directory with out a parent")]
    NoParentDirectory,
    #[error("directory not found")]
    DirectoryNotFound,
    #[error("file not found")]
    FileNotFound,
    #[error("no write permission to modify that file/directory")]
    NoWritePermission,
    #[error("no read permission to view contents that file/directory")]
    NoReadPermission,
    /// Reserved; no operation currently returns it.
    #[error("file system is readonly")]
    FileSystemReadOnly,
    /// Reserved; `mkdir("/")` reports `NoParentDirectory` instead.
    #[error("you can not recreate the root folder")]
    CanNotReCreateRoot,
    /// Reserved; no operation currently returns it.
    #[error("data source not supported")]
    DataSourceNotSupported,
}

impl FsError {
    /// Whether the error was caused by a read or write flag rather than a missing node.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FsError::NoWritePermission | FsError::NoReadPermission)
    }
}

pub type FsResult<T> = Result<T, FsError>;
