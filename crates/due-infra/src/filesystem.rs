//! Data directory layout helpers.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `DUE_DATA_DIR` environment variable
/// 2. `~/.due`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DUE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".due");
    }

    // Last resort: current directory
    PathBuf::from(".due")
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve a configured directory against the data directory.
///
/// Absolute and `~`-prefixed paths are used as given; anything else is
/// relative to `data_dir`.
pub fn resolve_dir(data_dir: &Path, configured: &str) -> PathBuf {
    let path = expand_home(Path::new(configured));
    if path.is_absolute() {
        path
    } else {
        data_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir_relative_to_data_dir() {
        let data_dir = PathBuf::from("/home/user/.due");
        assert_eq!(
            resolve_dir(&data_dir, "episodes"),
            PathBuf::from("/home/user/.due/episodes")
        );
        assert_eq!(resolve_dir(&data_dir, "/srv/corpora"), PathBuf::from("/srv/corpora"));
    }

    #[test]
    fn test_expand_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home(Path::new("~/.due/resources")), home.join(".due/resources"));
        assert_eq!(expand_home(Path::new("~")), home);
        assert_eq!(expand_home(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_home(Path::new("~user/x")), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("DUE_DATA_DIR", "/tmp/test-due");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-due"));
        unsafe {
            std::env::remove_var("DUE_DATA_DIR");
        }
    }
}
