use crate::core::template_dirs::dedup_paths;
use crate::core::{ConfigProvider, ThemeConfigLoader};
use crate::domain::model::THEME_CONFIG_FILE;
use crate::utils::error::{Result, TemplateError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Template directories contributed by the theme tier, lowest precedence first:
/// `base_templates_path`, the root ancestor down to the active theme, then
/// `theme_templates_path` as the site-level override.
pub async fn resolve_theme_chain<L, C>(loader: &L, config: &C) -> Result<Vec<PathBuf>>
where
    L: ThemeConfigLoader + ?Sized,
    C: ConfigProvider + ?Sized,
{
    let active_file = config.theme_config();
    let active_root = active_file.parent().map(Path::to_path_buf).unwrap_or_default();
    let active = loader.load(active_file).await?;

    // 從子主題往祖先收集，最後再反轉
    let mut dirs = Vec::new();
    if let Some(site_templates) = config.theme_templates_path() {
        dirs.push(site_templates.to_path_buf());
    }
    dirs.push(active.templates_dir(&active_root));

    let mut visited = HashSet::from([active_root]);
    let mut next = active.base_theme;

    while let Some(theme) = next {
        let theme_root = config.themes_path().join(&theme);
        if !visited.insert(theme_root.clone()) {
            return Err(TemplateError::ConfigCycleDetected { theme });
        }

        let theme_config = loader.load(&theme_root.join(THEME_CONFIG_FILE)).await?;
        let templates_dir = theme_config.templates_dir(&theme_root);
        tracing::debug!("Base theme {} provides {}", theme, templates_dir.display());

        dirs.push(templates_dir);
        next = theme_config.base_theme;
    }

    if let Some(base_templates) = config.base_templates_path() {
        dirs.push(base_templates.to_path_buf());
    }

    dirs.reverse();
    Ok(dedup_paths(dirs))
}
