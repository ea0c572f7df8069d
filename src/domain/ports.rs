use crate::domain::model::{PluginData, ThemeConfig};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;

    /// Every file beneath `dir`, recursively, as absolute paths.
    fn walk(&self, dir: &Path) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;

    fn read_to_string(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;

    fn write(&self, path: &Path, contents: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    fn create_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Succeeds when `path` does not exist.
    fn remove_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ThemeConfigLoader: Send + Sync {
    async fn load(&self, config_file: &Path) -> Result<ThemeConfig>;
}

pub trait PluginRegistry: Send + Sync {
    fn plugins(&self) -> Vec<PluginData>;
}

pub trait ConfigProvider: Send + Sync {
    fn views_dir(&self) -> &Path;
    fn theme_config(&self) -> &Path;
    fn themes_path(&self) -> &Path;
    fn theme_templates_path(&self) -> Option<&Path>;
    fn base_templates_path(&self) -> Option<&Path>;
    fn core_templates_path(&self) -> &Path;
    fn plugins_path(&self) -> &Path;
    fn theme_package_prefix(&self) -> &str;
    fn concurrency(&self) -> usize;
}
