//! Walker behaviour against a fixture tree with hidden directories,
//! a dependency cache and mixed extensions.

use blob_migrate::walker::{is_image, is_markup, Walker};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
}

fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
    files
        .into_iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

fn fixture() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for rel in [
        "index.html",
        "about.htm",
        "notes.txt",
        ".hidden.html",
        "pages/team.html",
        "pages/deep/nested/faq.html",
        "pages/deep/logo.png",
        ".git/config.html",
        "pages/.cache/stale.html",
        "node_modules/pkg/readme.html",
        "pages/node_modules/inner.html",
        "images/logo.PNG",
        "images/photo.jpeg",
        "images/.thumb.png",
        "images/raw.cr2",
        "images/sub/nested.png",
    ] {
        touch(root, rel);
    }
    dir
}

#[test]
fn finds_markup_outside_hidden_and_dependency_dirs() {
    let dir = fixture();
    let found = Walker::new(dir.path()).files(is_markup).unwrap();
    assert_eq!(
        relative(dir.path(), found),
        vec!["index.html", "pages/deep/nested/faq.html", "pages/team.html"]
    );
}

#[test]
fn flat_image_scan_does_not_recurse() {
    let dir = fixture();
    let images = dir.path().join("images");
    let found = Walker::new(&images).max_depth(1).files(is_image).unwrap();
    assert_eq!(relative(&images, found), vec!["logo.PNG", "photo.jpeg"]);
}

#[test]
fn hidden_root_is_still_walked() {
    let dir = tempdir().unwrap();
    touch(dir.path(), ".site/index.html");
    let root = dir.path().join(".site");
    let found = Walker::new(&root).files(is_markup).unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn missing_root_fails_the_walk() {
    let dir = tempdir().unwrap();
    let result = Walker::new(dir.path().join("nope")).files(is_markup);
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_fails_the_walk() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    touch(dir.path(), "index.html");
    touch(dir.path(), "locked/page.html");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits are not enforced for root; nothing to check then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = Walker::new(dir.path()).files(is_markup);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(result.is_err());
}
