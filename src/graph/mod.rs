//! Dependency graph model and builder.
//!
//! A graph is built from a modules root in one pass: every immediate entry is checked against
//! the focus neighborhood (see [`inclusion`]) and the excluded name prefixes, each surviving
//! module with a manifest becomes a node, and every declared dependency `d` of module `m`
//! becomes an edge `d -> m`.
//!
//! Edge endpoints are not checked against the node list. A dependency on a module that was
//! filtered out, or that does not exist at all, still produces an edge; the DOT backend
//! materialises a plain node for such names.
use crate::errors::ModGraphError;
use crate::manifest;
use crate::utils::module_walker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

pub mod inclusion;

/// Module name prefixes that are never drawn unless configured otherwise.
pub const DEFAULT_EXCLUDE_PREFIXES: [&str; 3] = ["google_", "l10n_", "test_"];

/// Inputs of a graph build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Restrict the graph to this module and its direct neighbors. Empty means no focus.
    pub focus: Option<String>,
    pub exclude_prefixes: Vec<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            focus: None,
            exclude_prefixes: DEFAULT_EXCLUDE_PREFIXES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl GraphOptions {
    #[must_use]
    pub fn with_focus(focus: Option<&str>) -> Self {
        Self { focus: focus.map(str::to_string), ..Self::default() }
    }

    /// The focus module, with an empty name treated as absent.
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref().filter(|f| !f.is_empty())
    }

    /// First configured prefix that `name` starts with.
    #[must_use]
    pub fn excluded_by(&self, name: &str) -> Option<&str> {
        self.exclude_prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| name.starts_with(prefix))
    }
}

/// `to` depends on `from`; drawn as an arrow from `from` to `to`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// Modules that passed every filter, in directory listing order.
    pub nodes: Vec<String>,
    /// In discovery order; duplicates are kept as declared.
    pub edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Build the graph for the modules under `root`.
    ///
    /// # Errors
    /// Returns `ModGraphError::Walk`/`Io` if `root` cannot be listed. Problems with individual
    /// modules never fail the build; they are logged and the module contributes no edges.
    pub fn build_from_directory(root: &Path, opts: &GraphOptions) -> Result<Self, ModGraphError> {
        let included = inclusion::compute_included(root, opts.focus())?;
        let mut graph = DependencyGraph {
            focus: opts.focus().map(str::to_string),
            ..Self::default()
        };

        for entry in module_walker::list_entries(root)? {
            let name = entry.name.as_str();
            if !included.is_empty() && !included.contains(name) {
                debug!("Skipping module {name}: outside the focus neighborhood");
                continue;
            }
            if let Some(prefix) = opts.excluded_by(name) {
                info!("Skipping module {name}: excluded by prefix '{prefix}'");
                continue;
            }

            info!("Processing module {name}");
            if !entry.is_dir {
                info!("Skipping {name}: not a directory");
                continue;
            }
            if manifest::manifest_path(&entry.path).is_none() {
                info!("Skipping {name}: no {} or {}", manifest::MANIFEST_FILE, manifest::LEGACY_MANIFEST_FILE);
                continue;
            }

            graph.add_node(name);
            for dependency in manifest::read_dependencies(root, name) {
                graph.add_edge(&dependency, name);
            }
        }

        let dangling = graph.dangling_references();
        if !dangling.is_empty() {
            debug!("Edges reference modules without a node: {}", dangling.into_iter().collect::<Vec<_>>().join(", "));
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, name: &str) {
        if !self.contains_node(name) {
            self.nodes.push(name.to_string());
        }
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push(Edge { from: from.to_string(), to: to.to_string() });
    }

    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Edge endpoints that are not declared nodes.
    #[must_use]
    pub fn dangling_references(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .filter(|name| !self.contains_node(name))
            .collect()
    }

    /// Save the graph as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `ModGraphError::Json` or `ModGraphError::Io` if serialization or writing fails.
    pub fn save_json(&self, path: &Path) -> Result<(), ModGraphError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a graph previously written by [`DependencyGraph::save_json`].
    ///
    /// # Errors
    /// Returns `ModGraphError::Io` if reading fails or `ModGraphError::Json` if the JSON is invalid.
    pub fn load_json(path: &Path) -> Result<Self, ModGraphError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
