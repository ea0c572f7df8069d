use crate::core::theme_chain::resolve_theme_chain;
use crate::core::{ConfigProvider, FileSystem, PluginRegistry, ThemeConfigLoader};
use crate::domain::model::TemplateDirectoryList;
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::PathBuf;

/// Drops repeated paths, keeping each at the position of its first occurrence.
pub fn dedup_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Core templates, then the theme chain, then non-theme plugins; deduplicated and
/// filtered to directories that exist.
pub async fn resolve_template_dirs<F, L, R, C>(
    fs: &F,
    loader: &L,
    registry: &R,
    config: &C,
) -> Result<TemplateDirectoryList>
where
    F: FileSystem,
    L: ThemeConfigLoader + ?Sized,
    R: PluginRegistry + ?Sized,
    C: ConfigProvider + ?Sized,
{
    let theme_dirs = resolve_theme_chain(loader, config).await?;

    let prefix = config.theme_package_prefix();
    let plugin_dirs = registry
        .plugins()
        .into_iter()
        .filter(|plugin| !plugin.is_theme(prefix))
        .map(|plugin| plugin.templates_dir(config.plugins_path()));

    let candidates = dedup_paths(
        std::iter::once(config.core_templates_path().to_path_buf())
            .chain(theme_dirs)
            .chain(plugin_dirs),
    );

    // buffered 保留原本順序
    let checked: Vec<(PathBuf, bool)> = stream::iter(candidates)
        .map(|dir| async move {
            let exists = fs.exists(&dir).await;
            (dir, exists)
        })
        .buffered(config.concurrency().max(1))
        .collect()
        .await;

    let dirs = checked
        .into_iter()
        .filter_map(|(dir, exists)| {
            if !exists {
                tracing::debug!("Skipping missing template directory {}", dir.display());
            }
            exists.then_some(dir)
        })
        .collect();

    Ok(TemplateDirectoryList::new(dirs))
}
