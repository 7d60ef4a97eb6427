//! Dependency graph discovery over a manifest tree.
//!
//! Edges point from the referencing manifest to the referenced one: if
//! `App.csproj` declares `<ProjectReference Include="..\Lib\Lib.csproj" />`
//! the graph holds `App -> Lib`. Cycles are allowed here; consumers that
//! walk the graph are responsible for guarding against them.

use std::collections::{BTreeMap, HashMap};

use lockstep_fs::{FileSystem, NormalizedPath};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::extract::extract_references;

/// Mapping from manifest path to the manifests it references.
///
/// Iteration follows path order, which is also the discovery order of
/// [`GraphBuilder`], so everything derived from the graph is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Adjacency list: key references each value, in declaration order.
    nodes: BTreeMap<NormalizedPath, Vec<NormalizedPath>>,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a manifest with no outgoing references. Existing edges are kept.
    pub fn add_node(&mut self, path: NormalizedPath) {
        self.nodes.entry(path).or_default();
    }

    /// Declare that `from` references `to`.
    ///
    /// `from` becomes a node if it is not one yet. `to` does not: a reference
    /// may point outside the scanned tree.
    pub fn add_edge(&mut self, from: NormalizedPath, to: NormalizedPath) {
        let references = self.nodes.entry(from).or_default();
        if !references.contains(&to) {
            references.push(to);
        }
    }

    /// Return the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `path` was discovered as a manifest.
    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Outgoing references of a manifest; empty for unknown paths.
    pub fn references_of(&self, path: &NormalizedPath) -> &[NormalizedPath] {
        self.nodes.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Manifests that reference `path` directly, in node order.
    pub fn dependents_of(&self, path: &NormalizedPath) -> Vec<&NormalizedPath> {
        self.nodes
            .iter()
            .filter(|(_, references)| references.contains(path))
            .map(|(from, _)| from)
            .collect()
    }

    /// Iterate over every node and its outgoing references.
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedPath, &[NormalizedPath])> {
        self.nodes
            .iter()
            .map(|(path, references)| (path, references.as_slice()))
    }
}

/// Builds a [`DependencyGraph`] by scanning a directory tree.
///
/// Each discovered manifest is read and parsed exactly once. Manifests with
/// an overlay use the overlay content instead of what is on disk, which lets
/// a pending edit take part in discovery before it is written.
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    fs: &'a dyn FileSystem,
    extensions: &'a [String],
    overlay: HashMap<NormalizedPath, String>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(fs: &'a dyn FileSystem, extensions: &'a [String]) -> Self {
        Self {
            fs,
            extensions,
            overlay: HashMap::new(),
        }
    }

    /// Use `content` for the manifest at `path` instead of reading it.
    pub fn with_overlay(mut self, path: NormalizedPath, content: impl Into<String>) -> Self {
        self.overlay.insert(path.clean(), content.into());
        self
    }

    /// Discover every manifest under `root` and assemble the graph.
    ///
    /// # Errors
    ///
    /// Fails on the first manifest that cannot be read or parsed; no partial
    /// graph is returned.
    pub fn build(&self, root: &NormalizedPath) -> Result<DependencyGraph> {
        let root = &root.clean();
        let mut manifests: Vec<NormalizedPath> = self
            .fs
            .list_files_recursively(root, self.extensions)?
            .into_iter()
            .map(|path| path.clean())
            .collect();

        // An overlay for a manifest that does not exist on disk yet still
        // belongs to the tree if it lives under the root.
        for path in self.overlay.keys() {
            if path.strip_prefix(root).is_some() && !manifests.contains(path) {
                manifests.push(path.clone());
            }
        }

        let mut graph = DependencyGraph::new();
        for manifest in manifests {
            let content = match self.overlay.get(&manifest) {
                Some(content) => Some(content.clone()),
                None => self.fs.read_file(&manifest)?,
            };
            let Some(content) = content else {
                warn!(manifest = %manifest, "Manifest disappeared during discovery");
                graph.add_node(manifest);
                continue;
            };

            let references = extract_references(&content).map_err(|e| match e {
                Error::Markup { message } => Error::Parse {
                    path: manifest.to_native(),
                    message,
                },
                other => other,
            })?;

            graph.add_node(manifest.clone());
            for reference in references {
                graph.add_edge(manifest.clone(), manifest.resolve_reference(&reference));
            }
        }

        debug!(
            root = %root,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built manifest dependency graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> NormalizedPath {
        NormalizedPath::new(s)
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_deduplicates() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(path("/r/A.csproj"), path("/r/B.csproj"));
        graph.add_edge(path("/r/A.csproj"), path("/r/B.csproj"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edge_target_is_not_a_node() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(path("/r/A.csproj"), path("/elsewhere/X.csproj"));
        assert!(graph.contains(&path("/r/A.csproj")));
        assert!(!graph.contains(&path("/elsewhere/X.csproj")));
    }

    #[test]
    fn test_add_node_keeps_existing_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(path("/r/A.csproj"), path("/r/B.csproj"));
        graph.add_node(path("/r/A.csproj"));
        assert_eq!(graph.references_of(&path("/r/A.csproj")).len(), 1);
    }

    #[test]
    fn test_dependents_of() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(path("/r/B.csproj"), path("/r/C.csproj"));
        graph.add_edge(path("/r/A.csproj"), path("/r/C.csproj"));
        graph.add_node(path("/r/C.csproj"));

        let dependents = graph.dependents_of(&path("/r/C.csproj"));
        assert_eq!(dependents, vec![&path("/r/A.csproj"), &path("/r/B.csproj")]);
    }

    #[test]
    fn test_references_of_unknown_is_empty() {
        let graph = DependencyGraph::new();
        assert!(graph.references_of(&path("/r/nope.csproj")).is_empty());
    }
}
