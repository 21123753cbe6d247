use crate::errors::ModGraphError;
use crate::graph::DependencyGraph;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Default artifact name when none is configured.
pub const DEFAULT_OUTPUT: &str = "dependency_graph.png";

/// Set to `1`/`true` to never launch a viewer, whatever the configuration says.
pub const NO_VIEW_ENV: &str = "MODGRAPH_NO_VIEW";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotTheme { Light, Dark }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir { LR, TB }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle { Curved, Ortho, Polyline }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotOptions {
    pub theme: DotTheme,
    pub rankdir: RankDir,
    pub splines: EdgeStyle,
    pub rounded: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { theme: DotTheme::Light, rankdir: RankDir::TB, splines: EdgeStyle::Curved, rounded: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat { Png, Svg, Pdf, Dot, Json }

impl OutputFormat {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "pdf" => Some(Self::Pdf),
            "dot" | "gv" => Some(Self::Dot),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer the format from the file extension of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_name)
    }

    /// `-T` argument for Graphviz, `None` for formats written without it.
    #[must_use]
    pub fn graphviz_format(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("png"),
            Self::Svg => Some("svg"),
            Self::Pdf => Some("pdf"),
            Self::Dot | Self::Json => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Open the written file with the platform viewer.
    pub view: bool,
    pub dot: DotOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { output: PathBuf::from(DEFAULT_OUTPUT), format: OutputFormat::Png, view: true, dot: DotOptions::default() }
    }
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self { Self {} }

    #[must_use]
    pub fn generate_dot(&self, graph: &DependencyGraph) -> String {
        self.generate_dot_with_options(graph, DotOptions::default())
    }

    /// Declared nodes first (the focus module highlighted), then one statement per edge.
    /// Edge endpoints without a declaration are left for Graphviz to create.
    #[must_use]
    pub fn generate_dot_with_options(&self, graph: &DependencyGraph, opts: DotOptions) -> String {
        let palette = Palette::for_theme(opts.theme);
        let rank = match opts.rankdir { RankDir::LR => "LR", RankDir::TB => "TB" };
        let splines = match opts.splines { EdgeStyle::Curved => "curved", EdgeStyle::Ortho => "ortho", EdgeStyle::Polyline => "polyline" };
        let node_style = if opts.rounded { "filled,rounded" } else { "filled" };

        let mut s = String::new();
        s.push_str("digraph dependencies {\n");
        s.push_str("  // Module dependency graph\n");
        let _ = write!(
            s,
            "  rankdir={rank};\n  graph [fontname=Helvetica, splines={splines}, bgcolor=\"{bg}\"];\n  node [shape=box, fontname=Helvetica, fontsize=10, style=\"{node_style}\", fillcolor=\"{fill}\", fontcolor=\"{font}\"];\n  edge [color=\"{edge}\"];\n",
            bg = palette.background,
            fill = palette.node,
            font = palette.font,
            edge = palette.edge,
        );

        for node in &graph.nodes {
            let id = quote_id(node);
            if graph.focus.as_deref() == Some(node.as_str()) {
                let _ = writeln!(s, "  {id} [label={id}, fillcolor=\"{}\", penwidth=2];", palette.focus);
            } else {
                let _ = writeln!(s, "  {id} [label={id}];");
            }
        }

        for edge in &graph.edges {
            let _ = writeln!(s, "  {} -> {};", quote_id(&edge.from), quote_id(&edge.to));
        }

        s.push_str("}\n");
        s
    }
}

struct Palette {
    background: &'static str,
    node: &'static str,
    focus: &'static str,
    font: &'static str,
    edge: &'static str,
}

impl Palette {
    fn for_theme(theme: DotTheme) -> Self {
        match theme {
            DotTheme::Light => Self { background: "white", node: "#e0f3ff", focus: "#ffe8a0", font: "black", edge: "#7f7f7f" },
            DotTheme::Dark => Self { background: "#1e1e1e", node: "#124559", focus: "#7a4c00", font: "white", edge: "#b0b0b0" },
        }
    }
}

fn quote_id(name: &str) -> String {
    format!("\"{}\"", escape_label(name))
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    #[must_use]
    pub fn new() -> Self { Self {} }

    /// Write `graph` to `opts.output` in `opts.format`, then optionally open it.
    ///
    /// # Errors
    /// Returns `ModGraphError::Visualization` if Graphviz cannot be run or fails,
    /// `ModGraphError::Json` for JSON encoding failures and `ModGraphError::Io` if the
    /// artifact cannot be written. A viewer that fails to start is only a warning.
    pub fn render(&self, graph: &DependencyGraph, opts: &RenderOptions) -> Result<(), ModGraphError> {
        match opts.format {
            OutputFormat::Json => graph.save_json(&opts.output)?,
            OutputFormat::Dot => {
                let dot = DotGenerator::new().generate_dot_with_options(graph, opts.dot);
                std::fs::write(&opts.output, dot)?;
            }
            format => {
                let dot = DotGenerator::new().generate_dot_with_options(graph, opts.dot);
                // `graphviz_format` is only `None` for the two arms above
                let target = format.graphviz_format().unwrap_or("png");
                std::fs::write(&opts.output, run_graphviz(&dot, target)?)?;
            }
        }
        info!(
            "Wrote {} ({} modules, {} edges)",
            opts.output.display(),
            graph.nodes.len(),
            graph.edges.len()
        );

        if opts.view {
            open_viewer(&opts.output);
        }
        Ok(())
    }
}

/// Pipe `dot` into Graphviz and return the rendered bytes.
///
/// # Errors
/// Returns `ModGraphError::Visualization` if `dot` cannot be spawned or exits unsuccessfully.
pub fn run_graphviz(dot: &str, format: &str) -> Result<Vec<u8>, ModGraphError> {
    let output = Command::new("dot")
        .arg(format!("-T{format}"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(dot.as_bytes())?;
            }
            child.wait_with_output()
        })
        .map_err(|e| ModGraphError::Visualization(format!("Failed to run graphviz 'dot': {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ModGraphError::Visualization(format!(
            "Graphviz 'dot' failed with code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// True when `MODGRAPH_NO_VIEW` asks to suppress the viewer.
#[must_use]
pub fn view_disabled_by_env() -> bool {
    std::env::var(NO_VIEW_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Launch the platform's default viewer for `path` without waiting for it.
pub fn open_viewer(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
    if let Err(e) = cmd.spawn() {
        warn!("Could not open viewer for {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        let mut g = DependencyGraph::default();
        g.add_node("base");
        g.add_node("sale");
        g.add_edge("base", "sale");
        g.add_edge("l10n_us", "sale");
        g
    }

    #[test]
    fn test_escape_label_quotes_and_backslashes() {
        assert_eq!(escape_label("a\"b\"c"), "a\\\"b\\\"c");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
        assert_eq!(quote_id("sale"), "\"sale\"");
    }

    #[test]
    fn test_dot_contains_nodes_and_dangling_edges() {
        let dot = DotGenerator::new().generate_dot(&sample());
        assert!(dot.starts_with("digraph dependencies {"));
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("  \"base\" [label=\"base\"];"));
        assert!(dot.contains("  \"base\" -> \"sale\";"));
        // Not declared as a node, only referenced by an edge
        assert!(dot.contains("  \"l10n_us\" -> \"sale\";"));
        assert!(!dot.contains("\"l10n_us\" [label"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_focus_is_highlighted_with_theme_colors() {
        let mut g = sample();
        g.focus = Some("sale".into());
        let light = DotGenerator::new().generate_dot(&g);
        assert!(light.contains("\"sale\" [label=\"sale\", fillcolor=\"#ffe8a0\", penwidth=2];"));

        let opts = DotOptions { theme: DotTheme::Dark, rankdir: RankDir::LR, splines: EdgeStyle::Ortho, rounded: false };
        let dark = DotGenerator::new().generate_dot_with_options(&g, opts);
        assert!(dark.contains("fillcolor=\"#7a4c00\""));
        assert!(dark.contains("bgcolor=\"#1e1e1e\""));
        assert!(dark.contains("rankdir=LR;"));
        assert!(dark.contains("splines=ortho"));
        assert!(dark.contains("style=\"filled\""));
    }

    #[test]
    fn test_output_format_inference() {
        assert_eq!(OutputFormat::from_path(Path::new("g.PNG")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("out/g.gv")), Some(OutputFormat::Dot));
        assert_eq!(OutputFormat::from_path(Path::new("g.json")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_path(Path::new("graph")), None);
        assert_eq!(OutputFormat::from_name("bmp"), None);
        assert_eq!(OutputFormat::Svg.graphviz_format(), Some("svg"));
        assert_eq!(OutputFormat::Dot.graphviz_format(), None);
    }

    #[test]
    fn test_render_dot_and_json_without_graphviz() {
        let dir = tempfile::tempdir().unwrap();
        let g = sample();

        let dot_path = dir.path().join("g.dot");
        let opts = RenderOptions { output: dot_path.clone(), format: OutputFormat::Dot, view: false, dot: DotOptions::default() };
        Renderer::new().render(&g, &opts).unwrap();
        assert!(std::fs::read_to_string(&dot_path).unwrap().contains("\"base\" -> \"sale\""));

        let json_path = dir.path().join("g.json");
        let opts = RenderOptions { output: json_path.clone(), format: OutputFormat::Json, ..opts };
        Renderer::new().render(&g, &opts).unwrap();
        assert_eq!(DependencyGraph::load_json(&json_path).unwrap(), g);
    }

    #[test]
    fn test_default_render_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.output, PathBuf::from("dependency_graph.png"));
        assert_eq!(opts.format, OutputFormat::Png);
        assert!(opts.view);
    }
}
