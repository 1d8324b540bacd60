//! Configuration types for RamFS Core

use serde::{Deserialize, Serialize};

use crate::Permissions;

/// Construction options applied to the root directory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsOption {
    /// Root is readable but not writable
    ReadOnly,
    /// Root is not readable
    DisallowRead,
}

/// Main filesystem configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsConfig {
    /// Applied in order; later options override earlier ones.
    #[serde(default)]
    pub options: Vec<FsOption>,
}

impl FsConfig {
    pub fn from_options(options: &[FsOption]) -> Self {
        Self {
            options: options.to_vec(),
        }
    }

    /// Resolve the options into the permissions of the root directory
    pub fn root_permissions(&self) -> Permissions {
        self.options
            .iter()
            .fold(Permissions::READ_WRITE, |mut perms, option| {
                match option {
                    FsOption::ReadOnly => {
                        perms.read = true;
                        perms.write = false;
                    }
                    FsOption::DisallowRead => perms.read = false,
                }
                perms
            })
    }
}
