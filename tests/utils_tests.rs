use modgraph::utils::module_walker;
use std::fs;
use tempfile::tempdir;

#[test]
fn module_walker_lists_immediate_entries_sorted() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sale").join("views")).unwrap();
    fs::create_dir_all(root.join("base")).unwrap();
    fs::write(root.join("README.md"), "addons").unwrap();

    let entries = module_walker::list_entries(root).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    // Nested directories are not listed
    assert_eq!(names, vec!["README.md", "base", "sale"]);
    assert!(!entries[0].is_dir);
    assert!(entries[1].is_dir);
    assert_eq!(entries[2].path, root.join("sale"));
}

#[test]
fn module_walker_errors_on_missing_or_file_root() {
    let dir = tempdir().unwrap();
    assert!(module_walker::list_entries(&dir.path().join("absent")).is_err());

    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(module_walker::list_entries(&file).is_err());
}
