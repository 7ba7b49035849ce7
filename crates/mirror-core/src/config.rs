//! Mirror configuration
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Files are read through [`mirror_fs::ConfigStore`], which
//! accepts TOML, JSON or YAML by extension.

use std::path::Path;
use std::time::Duration;

use mirror_fs::{ConfigStore, RobustnessConfig};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::date::DateZone;

/// Default bound on folder nesting while fetching.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Deepest folder nesting the fetcher will follow
    pub max_depth: usize,
    /// Zone in which remote calendar dates begin
    pub date_zone: DateZone,
    /// Report decisions without touching the filesystem
    pub dry_run: bool,
    /// How long a download waits for its write lock
    pub lock_timeout_ms: u64,
    /// Flush downloaded files to disk before renaming them into place
    pub fsync: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            date_zone: DateZone::Local,
            dry_run: false,
            lock_timeout_ms: 5_000,
            fsync: true,
        }
    }
}

impl MirrorConfig {
    /// Load from a `.toml`, `.json` or `.yaml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no mirror config, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(ConfigStore::with_robustness(self.robustness()).save(path, self)?)
    }

    /// Write settings for downloads.
    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            enable_fsync: self.fsync,
        }
    }
}
