//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Returns the path to the first `config_name` found in `start` or one of
/// its ancestors.
///
/// # Example
/// ```text
/// /home/user/repo/crates/foo/    ← start
/// /home/user/repo/docsplice.toml ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// `/`-separated form of a relative path, as matched against page suffixes.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("crates").join("foo");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docsplice.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("docsplice.toml")).unwrap();
        assert_eq!(found, dir.path().join("docsplice.toml"));

        assert_eq!(find_config_file(&nested, Path::new("missing.toml")), None);
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(Path::new("/"), &path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_slash_path() {
        let path: PathBuf = ["my_crate", "index.html"].iter().collect();
        assert_eq!(slash_path(&path), "my_crate/index.html");
        assert_eq!(slash_path(Path::new("index.html")), "index.html");
    }
}
