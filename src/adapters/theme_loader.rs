use crate::domain::model::ThemeConfig;
use crate::domain::ports::ThemeConfigLoader;
use crate::utils::error::{Result, TemplateError};
use async_trait::async_trait;
use std::path::Path;

/// Reads `theme.json` files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonThemeConfigLoader;

impl JsonThemeConfigLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ThemeConfigLoader for JsonThemeConfigLoader {
    async fn load(&self, config_file: &Path) -> Result<ThemeConfig> {
        let content = match tokio::fs::read_to_string(config_file).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::ConfigNotFound {
                    path: config_file.to_path_buf(),
                });
            }
            Err(err) => return Err(TemplateError::filesystem("read", config_file, err)),
        };

        serde_json::from_str(&content).map_err(|e| TemplateError::ConfigError {
            message: format!("Invalid theme configuration {}: {}", config_file.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_theme_config() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("theme.json");
        std::fs::write(
            &file,
            r#"{"id": "nodebb-theme-child", "baseTheme": "nodebb-theme-parent", "templates": "views"}"#,
        )
        .unwrap();

        let config = JsonThemeConfigLoader::new().load(&file).await.unwrap();

        assert_eq!(config.id.as_deref(), Some("nodebb-theme-child"));
        assert_eq!(config.base_theme.as_deref(), Some("nodebb-theme-parent"));
        assert_eq!(config.templates.as_deref(), Some("views"));
    }

    #[tokio::test]
    async fn test_missing_theme_config_is_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("absent/theme.json");

        let err = JsonThemeConfigLoader::new().load(&file).await.unwrap_err();
        assert!(matches!(err, TemplateError::ConfigNotFound { path } if path == file));
    }

    #[tokio::test]
    async fn test_malformed_theme_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("theme.json");
        std::fs::write(&file, "{ not json").unwrap();

        let err = JsonThemeConfigLoader::new().load(&file).await.unwrap_err();
        assert!(matches!(err, TemplateError::ConfigError { .. }));
    }
}
