use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "modgraph",
    version,
    about = "Render the dependency graph of a directory of plugin modules",
    long_about = "Scan every module directory under ADDONS_PATH, read the 'depends' list from its __manifest__.py (or legacy __openerp__.py) and render a graph with an arrow from each dependency to its dependent. With MODULE_NAME, only that module, its direct dependencies and its direct dependents are drawn. Output path, format, excluded name prefixes and styling come from modgraph.toml."
)]
pub struct Cli {
    /// Only print warnings and errors
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
    /// More diagnostics (-v for debug output)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Path to a TOML configuration file (default: ./modgraph.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Directory holding one subdirectory per module
    pub addons_path: Option<PathBuf>,
    /// Focus module: draw only it and its direct neighbors
    pub module_name: Option<String>,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments_are_optional() {
        let cli = Cli::try_parse_from(["modgraph"]).unwrap();
        assert!(cli.addons_path.is_none());
        assert!(cli.module_name.is_none());

        let cli = Cli::try_parse_from(["modgraph", "-vv", "addons", "sale"]).unwrap();
        assert_eq!(cli.addons_path, Some(PathBuf::from("addons")));
        assert_eq!(cli.module_name.as_deref(), Some("sale"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
