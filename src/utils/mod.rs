// Shared helpers: configuration, logging setup and module discovery
pub mod config {
    use crate::errors::ModGraphError;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const CONFIG_FILE: &str = "modgraph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct GraphConfig {
        pub exclude_prefixes: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct RenderConfig {
        pub output: Option<String>,
        pub format: Option<String>, // "png" | "svg" | "pdf" | "dot" | "json"
        pub view: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct DotConfig {
        pub rankdir: Option<String>, // "TB" | "LR"
        pub theme: Option<String>,   // "light" | "dark"
        pub splines: Option<String>, // "curved" | "ortho" | "polyline"
        pub rounded: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct Config {
        pub graph: Option<GraphConfig>,
        pub render: Option<RenderConfig>,
        pub dot: Option<DotConfig>,
    }

    /// Load and parse a config file.
    ///
    /// # Errors
    /// Returns `ModGraphError::Config` if the file cannot be read or is not valid config TOML.
    pub fn load_config_at(path: &Path) -> Result<Config, ModGraphError> {
        let err = |reason: String| ModGraphError::Config { file: path.to_path_buf(), reason };
        let data = fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        toml::from_str::<Config>(&data).map_err(|e| err(e.to_string()))
    }

    /// Look for `modgraph.toml` in `dir`. `Ok(None)` when there is none.
    ///
    /// # Errors
    /// Propagates `load_config_at` failures for a file that exists.
    pub fn load_config_near(dir: &Path) -> Result<Option<Config>, ModGraphError> {
        let path: PathBuf = dir.join(CONFIG_FILE);
        if path.is_file() {
            load_config_at(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub mod logging {
    use std::io::IsTerminal;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    /// Diagnostics go to stdout. `RUST_LOG` overrides the level chosen from the flags.
    pub fn init(quiet: bool, verbose: u8) {
        let default = if quiet {
            "warn"
        } else if verbose > 0 {
            "modgraph=debug,info"
        } else {
            "info"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        // A second init (e.g. repeated in-process runs in tests) keeps the first subscriber.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_ansi(std::io::stdout().is_terminal())
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .try_init();
    }
}

pub mod module_walker {
    use crate::errors::ModGraphError;
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// An immediate entry of the modules root.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ModuleEntry {
        pub name: String,
        pub path: PathBuf,
        pub is_dir: bool,
    }

    /// List the immediate entries of `root`, sorted by name.
    ///
    /// Plain files are included (callers decide what counts as a module); entries whose
    /// names are not valid UTF-8 are skipped.
    ///
    /// # Errors
    /// Returns `ModGraphError::Io` if `root` is missing or not a directory, and
    /// `ModGraphError::Walk` if it cannot be listed.
    pub fn list_entries(root: &Path) -> Result<Vec<ModuleEntry>, ModGraphError> {
        if !root.exists() {
            return Err(ModGraphError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", root.display()),
            )));
        }
        if !root.is_dir() {
            return Err(ModGraphError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("{} is not a directory", root.display()),
            )));
        }
        let mut out = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            out.push(ModuleEntry {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
                // Follows symlinked module directories
                is_dir: entry.path().is_dir(),
            });
        }
        Ok(out)
    }
}
