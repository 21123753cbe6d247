#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};

/// Create `root/name/__manifest__.py` declaring `depends`.
pub fn write_module(root: &Path, name: &str, depends: &[&str]) {
    let list: Vec<String> = depends.iter().map(|d| format!("'{d}'")).collect();
    write_file(
        &root.join(name).join("__manifest__.py"),
        &format!("# -*- coding: utf-8 -*-\n{{\n    'name': '{name}',\n    'depends': [{}],\n    'installable': True,\n}}\n", list.join(", ")),
    );
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, content).unwrap();
}

/// Write a config that renders DOT (no Graphviz needed) to `output` without a viewer.
pub fn write_dot_config(dir: &Path, output: &Path) -> PathBuf {
    let cfg = dir.join("modgraph.toml");
    write_file(
        &cfg,
        &format!("[render]\noutput = '{}'\nformat = \"dot\"\nview = false\n", output.display()),
    );
    cfg
}

/// The four-module layout: `base`, `sale -> base`, `l10n_us -> base`, `test_sale -> sale`.
pub fn sample_addons(root: &Path) {
    write_module(root, "base", &[]);
    write_module(root, "sale", &["base"]);
    write_module(root, "l10n_us", &["base"]);
    write_module(root, "test_sale", &["sale"]);
}
