use modgraph::utils::config;
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, content).unwrap();
}

#[test]
fn parses_full_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("modgraph.toml");
    let data = r#"
[graph]
exclude_prefixes = ["google_", "theme_"]

[render]
output = "deps.svg"
format = "svg"
view = false

[dot]
rankdir = "LR"
theme = "dark"
splines = "ortho"
rounded = false
"#;
    write(&cfg_path, data);

    let cfg = config::load_config_at(&cfg_path).expect("config parsed");
    assert_eq!(
        cfg.graph.as_ref().and_then(|g| g.exclude_prefixes.clone()),
        Some(vec!["google_".to_string(), "theme_".to_string()])
    );
    let render = cfg.render.as_ref().expect("render section");
    assert_eq!(render.output.as_deref(), Some("deps.svg"));
    assert_eq!(render.format.as_deref(), Some("svg"));
    assert_eq!(render.view, Some(false));
    let dot = cfg.dot.as_ref().expect("dot section");
    assert_eq!(dot.rankdir.as_deref(), Some("LR"));
    assert_eq!(dot.theme.as_deref(), Some("dark"));
    assert_eq!(dot.splines.as_deref(), Some("ortho"));
    assert_eq!(dot.rounded, Some(false));
}

#[test]
fn load_config_near_looks_for_default_name() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(config::load_config_near(tmp.path()).unwrap().is_none());

    write(&tmp.path().join("modgraph.toml"), "[render]\nview = false\n");
    let cfg = config::load_config_near(tmp.path()).unwrap().expect("found default config");
    assert_eq!(cfg.render.and_then(|r| r.view), Some(false));
}

#[test]
fn rejects_unknown_keys_and_bad_syntax() {
    let tmp = tempfile::tempdir().unwrap();
    let typo = tmp.path().join("typo.toml");
    write(&typo, "[render]\noutptu = 'x.png'\n");
    assert!(config::load_config_at(&typo).is_err());

    let broken = tmp.path().join("broken.toml");
    write(&broken, "[graph\n");
    assert!(config::load_config_at(&broken).is_err());

    assert!(config::load_config_at(&tmp.path().join("absent.toml")).is_err());
}
