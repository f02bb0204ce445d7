use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the database location. An explicit path (from `--db` or
    /// `REZEPT_DB`) wins over the per-user data directory.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "rezept")
                    .context("Could not determine home directory")?;
                proj_dirs.data_dir().join("rezept.db")
            }
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }

        Ok(Config { db_path })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_creates_parent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dir").join("recipes.db");

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.db_path, path);
        assert!(tmp.path().join("nested").join("dir").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn test_bare_file_name_override() {
        let config = Config::load(Some(PathBuf::from("recipes.db"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("recipes.db"));
    }
}
