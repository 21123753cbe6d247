use crate::cli::Cli;
use crate::errors::ModGraphError;
use crate::graph::{DependencyGraph, GraphOptions};
use crate::utils::config::{self, Config};
use crate::utils::logging;
use crate::visualization::{
    view_disabled_by_env, DotOptions, DotTheme, EdgeStyle, OutputFormat, RankDir, RenderOptions,
    Renderer, DEFAULT_OUTPUT,
};
use std::path::{Path, PathBuf};
use tracing::warn;

#[must_use]
pub fn usage() -> String {
    format!("Usage: {} addons_path [module_name]", env!("CARGO_PKG_NAME"))
}

/// Run the CLI logic in-process.
///
/// Returns an exit code: 0 on success, 1 when the modules root is missing or unreadable,
/// or when rendering fails.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    // Checked before anything touches the file system
    let Some(root) = cli.addons_path.as_deref() else {
        println!("{}", usage());
        return 1;
    };

    logging::init(cli.quiet, cli.verbose);

    let cfg = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("{e}; using defaults");
            Config::default()
        }
    };
    let graph_opts = graph_options(&cfg, cli.module_name.as_deref());
    let render_opts = render_options(&cfg);

    let graph = match DependencyGraph::build_from_directory(root, &graph_opts) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Build failed for {}: {e}", root.display());
            return 1;
        }
    };

    if let Err(e) = Renderer::new().render(&graph, &render_opts) {
        eprintln!("Render failed: {e}");
        return 1;
    }
    0
}

/// Explicit `--config` path, else `modgraph.toml` in the current directory, else defaults.
///
/// # Errors
/// Returns `ModGraphError::Config` for an unreadable or invalid file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ModGraphError> {
    match explicit {
        Some(path) => config::load_config_at(path),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(config::load_config_near(&cwd)?.unwrap_or_default())
        }
    }
}

#[must_use]
pub fn graph_options(cfg: &Config, focus: Option<&str>) -> GraphOptions {
    let mut opts = GraphOptions::with_focus(focus);
    if let Some(prefixes) = cfg.graph.as_ref().and_then(|g| g.exclude_prefixes.clone()) {
        opts.exclude_prefixes = prefixes;
    }
    opts
}

#[must_use]
pub fn render_options(cfg: &Config) -> RenderOptions {
    let render = cfg.render.clone().unwrap_or_default();
    let output = PathBuf::from(render.output.as_deref().unwrap_or(DEFAULT_OUTPUT));

    let format = match render.format.as_deref() {
        Some(name) => OutputFormat::from_name(name).unwrap_or_else(|| {
            warn!("Unknown output format '{name}', inferring from the output path");
            OutputFormat::from_path(&output).unwrap_or(OutputFormat::Png)
        }),
        None => OutputFormat::from_path(&output).unwrap_or(OutputFormat::Png),
    };

    let mut dot = DotOptions::default();
    if let Some(d) = cfg.dot.as_ref() {
        if let Some(v) = d.theme.as_deref() {
            dot.theme = if v == "dark" { DotTheme::Dark } else { DotTheme::Light };
        }
        if let Some(v) = d.rankdir.as_deref() {
            dot.rankdir = if v.eq_ignore_ascii_case("LR") { RankDir::LR } else { RankDir::TB };
        }
        if let Some(v) = d.splines.as_deref() {
            dot.splines = match v {
                "ortho" => EdgeStyle::Ortho,
                "polyline" => EdgeStyle::Polyline,
                _ => EdgeStyle::Curved,
            };
        }
        if let Some(v) = d.rounded {
            dot.rounded = v;
        }
    }

    RenderOptions {
        output,
        format,
        view: render.view.unwrap_or(true) && !view_disabled_by_env(),
        dot,
    }
}
