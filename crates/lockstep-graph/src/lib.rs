//! Manifest reference graph for lockstep
//!
//! Discovers project manifests under a root directory, extracts the
//! references each one declares, and answers the question "which manifests
//! are affected when this one changes?".
//!
//! # Example
//!
//! ```
//! use lockstep_fs::NormalizedPath;
//! use lockstep_graph::{DependencyGraph, ImpactResolver};
//!
//! let app = NormalizedPath::new("/repo/App/App.csproj");
//! let lib = NormalizedPath::new("/repo/Lib/Lib.csproj");
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node(lib.clone());
//! graph.add_edge(app.clone(), lib.clone());
//!
//! let impact = ImpactResolver::new(&graph).resolve(&lib);
//! assert_eq!(impact.manifests(), &[lib, app]);
//! ```

pub mod error;
pub mod extract;
pub mod graph;
pub mod impact;

pub use error::{Error, Result};
pub use extract::extract_references;
pub use graph::{DependencyGraph, GraphBuilder};
pub use impact::{ImpactResolver, ImpactSet};
