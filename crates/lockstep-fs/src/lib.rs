//! Filesystem abstraction for lockstep
//!
//! Provides normalized path handling, reference resolution between
//! manifests, and the file I/O seam used by the higher layers.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod filesystem;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::WellKnownFile;
pub use error::{Error, Result};
pub use filesystem::{FileSystem, LocalFileSystem};
pub use path::NormalizedPath;
