//! RamFS Core — volatile in-memory filesystem namespace
//!
//! This crate provides a hierarchical tree of directories and files addressed
//! by slash-delimited paths, with per-node read/write flags and nanosecond
//! timestamps. Nothing is persisted; dropping the [`RamFs`] drops everything.

pub mod clock;
pub mod config;
pub mod error;
pub mod namespace;
pub mod path;
pub mod shared;
pub mod types;

// Re-export key types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FsConfig, FsOption};
pub use error::{FsError, FsResult};
pub use namespace::RamFs;
pub use path::{normalize_path, parent_path};
pub use shared::SharedRamFs;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FsError::NoParentDirectory;
        assert_eq!(err.to_string(), "you can not create a directory with out a parent");
    }

    #[test]
    fn test_config_creation() {
        let config = FsConfig {
            options: vec![FsOption::ReadOnly],
        };
        let fs = RamFs::new(config);
        assert!(fs.root().permissions.read);
        assert!(!fs.root().permissions.write);
    }
}
