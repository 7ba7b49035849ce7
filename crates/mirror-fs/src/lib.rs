//! Filesystem layer for the course portal mirror
//!
//! Provides normalized path handling, segment validation for mirrored names,
//! and safe I/O operations (atomic writes, modification time handling).

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use filetime::FileTime;
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, validate_segment};
