use crate::errors::ModGraphError;
use crate::manifest::read_dependencies;
use crate::utils::module_walker;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Modules to draw when focusing on `focus`: the focus itself, its direct dependencies and
/// its direct dependents. One hop only, never the transitive closure.
///
/// Without a focus (or with an empty one) the result is empty, which callers read as
/// "include everything"; the root is not listed in that case.
///
/// # Errors
/// Returns an error if `root` cannot be listed.
pub fn compute_included(root: &Path, focus: Option<&str>) -> Result<BTreeSet<String>, ModGraphError> {
    let Some(focus) = focus.filter(|f| !f.is_empty()) else {
        return Ok(BTreeSet::new());
    };

    let mut included = BTreeSet::from([focus.to_string()]);
    included.extend(read_dependencies(root, focus));

    for entry in module_walker::list_entries(root)? {
        if !entry.is_dir {
            continue;
        }
        if read_dependencies(root, &entry.name).iter().any(|d| d == focus) {
            included.insert(entry.name);
        }
    }

    info!("includes: {}", included.iter().map(String::as_str).collect::<Vec<_>>().join(", "));
    Ok(included)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use std::fs;
    use tempfile::tempdir;

    fn module(root: &Path, name: &str, manifest: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_focus_means_no_filter() {
        let dir = tempdir().unwrap();
        assert!(compute_included(dir.path(), None).unwrap().is_empty());
        assert!(compute_included(dir.path(), Some("")).unwrap().is_empty());
        // The root is not touched without a focus
        assert!(compute_included(&dir.path().join("absent"), None).unwrap().is_empty());
    }

    #[test]
    fn one_hop_in_both_directions() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        module(root, "A", "{'depends': []}");
        module(root, "B", "{'depends': ['A']}");
        module(root, "C", "{'depends': ['B']}");
        module(root, "D", "{'depends': ['C']}");

        assert_eq!(compute_included(root, Some("B")).unwrap(), set(&["A", "B", "C"]));
    }

    #[test]
    fn dependencies_need_not_exist() {
        let dir = tempdir().unwrap();
        module(dir.path(), "sale", "{'depends': ['base', 'mail']}");
        assert_eq!(compute_included(dir.path(), Some("sale")).unwrap(), set(&["base", "mail", "sale"]));
    }

    #[test]
    fn unknown_focus_is_alone() {
        let dir = tempdir().unwrap();
        module(dir.path(), "base", "{}");
        assert_eq!(compute_included(dir.path(), Some("ghost")).unwrap(), set(&["ghost"]));
    }

    #[test]
    fn broken_manifests_do_not_abort() {
        let dir = tempdir().unwrap();
        module(dir.path(), "base", "{}");
        module(dir.path(), "broken", "{'depends': [");
        module(dir.path(), "sale", "{'depends': ('base',)}");
        assert_eq!(compute_included(dir.path(), Some("base")).unwrap(), set(&["base", "sale"]));
    }

    #[test]
    fn missing_root_with_focus_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(compute_included(&dir.path().join("absent"), Some("base")).is_err());
    }
}
