//! Shared test utilities for the lockstep workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`tree::TestTree`] builder for manifest trees with lock files

pub mod tree;

pub use tree::{TestTree, manifest_xml};
