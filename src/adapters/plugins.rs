use crate::domain::model::{PluginData, PLUGIN_CONFIG_FILE};
use crate::domain::ports::PluginRegistry;
use crate::utils::error::{Result, TemplateError};
use std::collections::BTreeMap;
use std::path::Path;

/// Plugin registry keyed by plugin id.
#[derive(Debug, Clone, Default)]
pub struct StaticPluginRegistry {
    plugins: BTreeMap<String, PluginData>,
}

impl StaticPluginRegistry {
    pub fn new(plugins: impl IntoIterator<Item = PluginData>) -> Self {
        let mut registry = Self::default();
        registry.extend(plugins);
        registry
    }

    /// Registers every `<plugins_path>/<dir>/plugin.json`. A missing `plugins_path` yields an
    /// empty registry; unreadable manifests are skipped with a warning.
    pub async fn discover(plugins_path: &Path) -> Result<Self> {
        let mut registry = Self::default();

        let mut entries = match tokio::fs::read_dir(plugins_path).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Plugins path {} does not exist", plugins_path.display());
                return Ok(registry);
            }
            Err(err) => return Err(TemplateError::filesystem("list", plugins_path, err)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| TemplateError::filesystem("list", plugins_path, err))?
        {
            let manifest = entry.path().join(PLUGIN_CONFIG_FILE);
            let content = match tokio::fs::read_to_string(&manifest).await {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    tracing::warn!("Skipping plugin manifest {}: {}", manifest.display(), err);
                    continue;
                }
            };

            match serde_json::from_str::<PluginData>(&content) {
                Ok(plugin) => {
                    tracing::debug!("Discovered plugin {}", plugin.id);
                    registry.insert(plugin);
                }
                Err(err) => {
                    tracing::warn!("Skipping malformed plugin manifest {}: {}", manifest.display(), err);
                }
            }
        }

        Ok(registry)
    }

    pub fn insert(&mut self, plugin: PluginData) -> Option<PluginData> {
        self.plugins.insert(plugin.id.clone(), plugin)
    }

    pub fn extend(&mut self, plugins: impl IntoIterator<Item = PluginData>) {
        for plugin in plugins {
            self.insert(plugin);
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginRegistry for StaticPluginRegistry {
    fn plugins(&self) -> Vec<PluginData> {
        self.plugins.values().cloned().collect()
    }
}
