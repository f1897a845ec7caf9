use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Self::with_config(config)
    }

    /// Create an application instance from an explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.config_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                config.config_dir.display()
            )
        })?;

        tracing::info!(
            "Application initialized (store {})",
            if config.store.enabled { "enabled" } else { "disabled" }
        );

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Location of the forecast store, or `None` when persistence is disabled
    pub fn store_path(&self) -> Option<PathBuf> {
        self.config
            .store
            .enabled
            .then(|| self.config.store_path())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            config_dir: dir.join("tenki"),
            ..Config::default()
        }
    }

    #[test]
    fn test_with_config_creates_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let app = App::with_config(config).unwrap();
        assert!(app.config().config_dir.is_dir());
    }

    #[test]
    fn test_store_path_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let app = App::with_config(config_in(tmp.path())).unwrap();
        let path = app.store_path().unwrap();
        assert_eq!(path, tmp.path().join("tenki").join("forecasts.db"));
    }

    #[test]
    fn test_store_path_when_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.store.enabled = false;
        let app = App::with_config(config).unwrap();
        assert!(app.store_path().is_none());
    }
}
