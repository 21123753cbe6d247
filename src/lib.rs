//! modgraph: module dependency graphs for plugin directories
//!
//! Scan a directory of plugin modules, read the `depends` list from each module's manifest
//! (`__manifest__.py`, or the legacy `__openerp__.py`) and render the resulting graph with
//! Graphviz, one arrow from each dependency to its dependent.
//!
//! # Features
//! - Safe literal parsing of manifests: nothing is evaluated
//! - Focus mode: a module plus its direct dependencies and direct dependents
//! - Name-prefix exclusion (`google_`, `l10n_`, `test_` by default)
//! - PNG, SVG and PDF through Graphviz; DOT and JSON written directly
//!
//! # Quickstart (Library)
//! ```no_run
//! use modgraph::graph::{DependencyGraph, GraphOptions};
//! use modgraph::visualization::DotGenerator;
//!
//! let root = std::path::Path::new("addons");
//! let graph = DependencyGraph::build_from_directory(root, &GraphOptions::with_focus(Some("sale")))
//!     .expect("list modules");
//! println!("{}", DotGenerator::new().generate_dot(&graph));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! modgraph ./addons
//! modgraph ./addons sale
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod manifest;
pub mod parser;
pub mod utils;
pub mod visualization;
