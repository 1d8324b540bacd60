//! Thread-safe handle around a [`RamFs`]
//!
//! One mutex guards the whole namespace, so every operation runs as a single
//! critical section. Operations validate before they mutate, which keeps the
//! state usable after a panic poisoned the lock.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::FsResult;
use crate::{FsConfig, FsOption, NodeInfo, OwnedListing, Permissions, RamFs};

#[derive(Clone, Debug, Default)]
pub struct SharedRamFs {
    inner: Arc<Mutex<RamFs>>,
}

impl SharedRamFs {
    pub fn new(config: FsConfig) -> Self {
        Self::from_fs(RamFs::new(config))
    }

    pub fn with_options(options: &[FsOption]) -> Self {
        Self::from_fs(RamFs::with_options(options))
    }

    pub fn from_fs(fs: RamFs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fs)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RamFs> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access, for sequences that must not interleave
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut RamFs) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn mkdir(&self, path: &str) -> FsResult<()> {
        self.lock().mkdir(path)
    }

    pub fn write_file(&self, path: &str, content: impl Into<Vec<u8>>) -> FsResult<()> {
        self.lock().write_file(path, content)
    }

    pub fn file_get_contents(&self, path: &str) -> FsResult<Vec<u8>> {
        self.lock().file_get_contents(path)
    }

    /// Snapshot of the listing taken under the lock
    pub fn ls(&self, path: &str) -> FsResult<OwnedListing> {
        self.lock().ls(path).map(|listing| listing.to_owned_listing())
    }

    pub fn rm(&self, path: &str) -> FsResult<()> {
        self.lock().rm(path)
    }

    pub fn set_permissions(&self, path: &str, permissions: Permissions) -> FsResult<()> {
        self.lock().set_permissions(path, permissions)
    }

    pub fn stat(&self, path: &str) -> FsResult<NodeInfo> {
        self.lock().stat(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().exists(path)
    }
}

impl From<RamFs> for SharedRamFs {
    fn from(fs: RamFs) -> Self {
        Self::from_fs(fs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_writers() {
        let fs = SharedRamFs::default();
        fs.mkdir("/work").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fs = fs.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        fs.write_file(&format!("/work/{}-{}", i, j), vec![i as u8; j])
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let listing = fs.ls("/work").unwrap();
        assert_eq!(listing.files.len(), 8 * 25);
        assert_eq!(fs.file_get_contents("/work/3-4").unwrap(), vec![3u8; 4]);
    }

    #[test]
    fn test_with_lock_groups_operations() {
        let fs = SharedRamFs::with_options(&[FsOption::ReadOnly]);
        let created = fs.with_lock(|fs| {
            fs.set_permissions("/", Permissions::READ_WRITE)?;
            fs.mkdir("/a")?;
            fs.set_permissions("/", Permissions::READ_ONLY)
        });
        assert!(created.is_ok());
        assert!(fs.exists("/a"));
        assert!(fs.mkdir("/b").is_err());
    }

    #[test]
    fn test_usable_after_poisoned_lock() {
        let fs = SharedRamFs::default();
        fs.mkdir("/a").unwrap();

        let poisoner = fs.clone();
        let result = thread::spawn(move || {
            poisoner.with_lock(|_| panic!("poison the lock"));
        })
        .join();
        assert!(result.is_err());

        assert!(fs.exists("/a"));
        fs.write_file("/a/f", "ok").unwrap();
    }
}
