//! Impact-set resolution: who depends on a changed manifest.

use std::collections::{HashMap, HashSet};

use lockstep_fs::NormalizedPath;
use tracing::debug;

use crate::graph::DependencyGraph;

/// The changed manifest followed by every manifest that references it,
/// directly or transitively, in traversal order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactSet {
    manifests: Vec<NormalizedPath>,
}

impl ImpactSet {
    /// The manifest the impact set was computed for.
    pub fn changed(&self) -> &NormalizedPath {
        &self.manifests[0]
    }

    /// The changed manifest first, then its dependents.
    pub fn manifests(&self) -> &[NormalizedPath] {
        &self.manifests
    }

    /// Dependents only, without the changed manifest.
    pub fn dependents(&self) -> &[NormalizedPath] {
        &self.manifests[1..]
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.manifests.contains(path)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// Always false: the changed manifest is a member.
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedPath> {
        self.manifests.iter()
    }

    pub fn into_vec(self) -> Vec<NormalizedPath> {
        self.manifests
    }
}

impl<'a> IntoIterator for &'a ImpactSet {
    type Item = &'a NormalizedPath;
    type IntoIter = std::slice::Iter<'a, NormalizedPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks a [`DependencyGraph`] against edge direction.
///
/// The reverse index is computed once, so one resolver can answer several
/// queries over the same graph.
#[derive(Debug)]
pub struct ImpactResolver<'a> {
    /// Reverse adjacency: key is referenced by each value, in node order.
    dependents: HashMap<&'a NormalizedPath, Vec<&'a NormalizedPath>>,
}

impl<'a> ImpactResolver<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        let mut dependents: HashMap<&'a NormalizedPath, Vec<&'a NormalizedPath>> = HashMap::new();
        for (from, references) in graph.iter() {
            for to in references {
                dependents.entry(to).or_default().push(from);
            }
        }
        Self { dependents }
    }

    /// Compute the impact set of `changed`.
    ///
    /// Depth-first, visiting each manifest's direct dependents in graph order.
    /// A manifest enters the result once; revisits are skipped, which is what
    /// makes resolution terminate on circular references. Paths the graph
    /// does not know are treated as having no dependents.
    pub fn resolve(&self, changed: &NormalizedPath) -> ImpactSet {
        let changed = changed.clean();
        let mut seen: HashSet<&NormalizedPath> = HashSet::new();
        let mut manifests = Vec::new();
        let mut stack: Vec<&NormalizedPath> = vec![&changed];

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            manifests.push(current.clone());

            if let Some(direct) = self.dependents.get(current) {
                // Reversed so the first dependent is visited first
                stack.extend(direct.iter().rev().copied().filter(|d| !seen.contains(*d)));
            }
        }

        debug!(
            changed = %changed,
            dependents = manifests.len() - 1,
            "Resolved impact set"
        );
        ImpactSet { manifests }
    }
}
