pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_compiler_config, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME_PACKAGE_PREFIX: &str = "nodebb-theme-";
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Explicit settings for one compile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    pub views_dir: PathBuf,
    pub theme_config: PathBuf,
    pub themes_path: PathBuf,
    pub theme_templates_path: Option<PathBuf>,
    pub base_templates_path: Option<PathBuf>,
    pub core_templates_path: PathBuf,
    pub plugins_path: PathBuf,
    pub theme_package_prefix: String,
    pub concurrency: usize,
}

impl CompilerSettings {
    pub fn new(
        views_dir: impl Into<PathBuf>,
        theme_config: impl Into<PathBuf>,
        themes_path: impl Into<PathBuf>,
        core_templates_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            views_dir: views_dir.into(),
            theme_config: theme_config.into(),
            themes_path: themes_path.into(),
            theme_templates_path: None,
            base_templates_path: None,
            core_templates_path: core_templates_path.into(),
            plugins_path: PathBuf::from("node_modules"),
            theme_package_prefix: DEFAULT_THEME_PACKAGE_PREFIX.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_theme_templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_templates_path = Some(path.into());
        self
    }

    pub fn with_base_templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_templates_path = Some(path.into());
        self
    }

    pub fn with_plugins_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugins_path = path.into();
        self
    }

    pub fn with_theme_package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.theme_package_prefix = prefix.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

impl ConfigProvider for CompilerSettings {
    fn views_dir(&self) -> &Path {
        &self.views_dir
    }

    fn theme_config(&self) -> &Path {
        &self.theme_config
    }

    fn themes_path(&self) -> &Path {
        &self.themes_path
    }

    fn theme_templates_path(&self) -> Option<&Path> {
        self.theme_templates_path.as_deref()
    }

    fn base_templates_path(&self) -> Option<&Path> {
        self.base_templates_path.as_deref()
    }

    fn core_templates_path(&self) -> &Path {
        &self.core_templates_path
    }

    fn plugins_path(&self) -> &Path {
        &self.plugins_path
    }

    fn theme_package_prefix(&self) -> &str {
        &self.theme_package_prefix
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl Validate for CompilerSettings {
    fn validate(&self) -> Result<()> {
        validate_compiler_config(self)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "compile-templates")]
#[command(about = "Resolve theme and plugin template overrides into a compiled views directory")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of the path flags below
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "build/views")]
    pub views_dir: PathBuf,

    #[arg(long, default_value = "themes/default/theme.json")]
    pub theme_config: PathBuf,

    #[arg(long, default_value = "themes")]
    pub themes_path: PathBuf,

    #[arg(long)]
    pub theme_templates_path: Option<PathBuf>,

    #[arg(long)]
    pub base_templates_path: Option<PathBuf>,

    #[arg(long, default_value = "src/views")]
    pub core_templates_path: PathBuf,

    #[arg(long, default_value = "node_modules")]
    pub plugins_path: PathBuf,

    #[arg(long, default_value = DEFAULT_THEME_PACKAGE_PREFIX)]
    pub theme_package_prefix: String,

    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log per-phase timing and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn settings(&self) -> CompilerSettings {
        CompilerSettings {
            views_dir: self.views_dir.clone(),
            theme_config: self.theme_config.clone(),
            themes_path: self.themes_path.clone(),
            theme_templates_path: self.theme_templates_path.clone(),
            base_templates_path: self.base_templates_path.clone(),
            core_templates_path: self.core_templates_path.clone(),
            plugins_path: self.plugins_path.clone(),
            theme_package_prefix: self.theme_package_prefix.clone(),
            concurrency: self.concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = CompilerSettings::new("build/views", "themes/a/theme.json", "themes", "src/views");

        assert_eq!(settings.theme_package_prefix(), "nodebb-theme-");
        assert_eq!(settings.concurrency(), DEFAULT_CONCURRENCY);
        assert!(settings.theme_templates_path().is_none());
        assert!(settings.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_parses_paths() {
        let cli = CliConfig::parse_from([
            "compile-templates",
            "--views-dir",
            "/srv/views",
            "--theme-templates-path",
            "/srv/themes/child/templates",
            "--concurrency",
            "4",
        ]);
        let settings = cli.settings();

        assert_eq!(settings.views_dir, PathBuf::from("/srv/views"));
        assert_eq!(
            settings.theme_templates_path,
            Some(PathBuf::from("/srv/themes/child/templates"))
        );
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.core_templates_path, PathBuf::from("src/views"));
    }
}
