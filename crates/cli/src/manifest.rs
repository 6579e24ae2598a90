use anyhow::{Context as AnyhowContext, Result};
use nsprefix_discovery::{FileManifest, FileRecord};
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Read a JSON manifest of `relative path -> FileRecord`
pub fn load_manifest(path: &Path) -> Result<FileManifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}

/// Build a manifest from every `*.php` file under `target_dir`
pub fn walk_manifest(target_dir: &Path) -> Result<FileManifest> {
    let mut files = FileManifest::new();

    for entry in WalkDir::new(target_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Symlink loops and unreadable directories are not fatal here;
                // unreadable files still fail later when they are scanned.
                log::warn!("Skipping walk entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_php(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(target_dir)
            .with_context(|| format!("{} is outside the target directory", entry.path().display()))?;
        let relative_path = to_forward_slashes(relative);
        let record = FileRecord::new(
            package_name(relative),
            entry.path().to_path_buf(),
            relative_path.clone(),
        );
        files.insert(relative_path, record);
    }

    log::debug!("Found {} PHP files under {}", files.len(), target_dir.display());
    Ok(files)
}

fn is_php(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
}

fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `vendor/package` from the first two directories, or the first directory
/// alone for files only one level deep
fn package_name(relative: &Path) -> String {
    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .take(2)
                .collect()
        })
        .unwrap_or_default();
    dirs.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_package_name() {
        assert_eq!(package_name(&PathBuf::from("acme/http/src/Client.php")), "acme/http");
        assert_eq!(package_name(&PathBuf::from("acme/http/Client.php")), "acme/http");
        assert_eq!(package_name(&PathBuf::from("loose/file.php")), "loose");
        assert_eq!(package_name(&PathBuf::from("top.php")), "");
    }

    #[test]
    fn test_walk_collects_php_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("acme/http/src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("Client.php"), "<?php\n").unwrap();
        fs::write(src.join("README.md"), "# readme\n").unwrap();

        let files = walk_manifest(dir.path()).unwrap();
        let keys: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["acme/http/src/Client.php"]);
        assert_eq!(files["acme/http/src/Client.php"].package_name, "acme/http");
    }
}
