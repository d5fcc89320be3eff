//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use gomarket_cart::CartStore;
use gomarket_storage::FileStore;
use tracing::debug;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        if let Some(ref path) = config_path {
            debug!(path = %path.display(), "Loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Path of the storage document.
    ///
    /// A configured relative path resolves against the config file's
    /// directory, or the working directory when no file was loaded.
    pub fn storage_path(&self) -> PathBuf {
        match self.config.storage.path {
            Some(ref path) => {
                let base = self
                    .config_path
                    .as_deref()
                    .and_then(Path::parent)
                    .unwrap_or(&self.cwd);
                resolve(base, path)
            }
            None => data_dir().join("gomarket").join("storage.json"),
        }
    }

    /// Open the persisted cart and hydrate it.
    pub async fn open_cart(&self) -> Result<CartStore<FileStore>> {
        let path = self.storage_path();
        debug!(path = %path.display(), "Using storage document");

        let store = Arc::new(FileStore::new(&path));
        CartStore::open(store, self.config.cart.clone())
            .await
            .with_context(|| format!("Failed to load cart from {}", path.display()))
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Resolve `path` against `base` unless it is absolute.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context(config: CliConfig, config_path: Option<PathBuf>, cwd: &Path) -> Context {
        Context {
            config,
            config_path,
            output: Output::new(true),
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".gomarket.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(dir.path().join(".gomarket.toml")));
    }

    #[test]
    fn test_storage_path_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.path = Some("data/storage.json".to_string());

        let ctx = context(
            config,
            Some(dir.path().join("gomarket.toml")),
            Path::new("/somewhere/else"),
        );
        assert_eq!(ctx.storage_path(), dir.path().join("data").join("storage.json"));
    }

    #[test]
    fn test_storage_path_relative_to_cwd_without_config_file() {
        let dir = tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.path = Some("storage.json".to_string());

        let ctx = context(config, None, dir.path());
        assert_eq!(ctx.storage_path(), dir.path().join("storage.json"));
    }

    #[tokio::test]
    async fn test_open_cart_round_trip() {
        let dir = tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.path = Some("storage.json".to_string());
        let ctx = context(config, None, dir.path());

        let cart = ctx.open_cart().await.unwrap();
        cart.add_to_cart(gomarket_cart::Product::new("p1", "Shirt", "", 10.0))
            .await
            .unwrap();
        drop(cart);

        let cart = ctx.open_cart().await.unwrap();
        assert_eq!(cart.items().await.len(), 1);
    }
}
