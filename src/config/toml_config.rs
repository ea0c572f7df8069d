use crate::config::{CompilerSettings, DEFAULT_CONCURRENCY, DEFAULT_THEME_PACKAGE_PREFIX};
use crate::domain::model::PluginData;
use crate::utils::error::{Result, TemplateError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub paths: PathsConfig,
    pub compile: Option<CompileConfig>,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(default)]
    pub plugins: Vec<PluginData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub views_dir: PathBuf,
    pub theme_config: PathBuf,
    pub themes_path: PathBuf,
    pub theme_templates_path: Option<PathBuf>,
    pub base_templates_path: Option<PathBuf>,
    pub core_templates_path: PathBuf,
    pub plugins_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    pub concurrency: Option<usize>,
    pub theme_package_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置，相對路徑以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| TemplateError::filesystem("read", path, err))?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            config.paths.rebase(base);
        }
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${THEMES_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn settings(&self) -> CompilerSettings {
        let compile = self.compile.as_ref();
        CompilerSettings {
            views_dir: self.paths.views_dir.clone(),
            theme_config: self.paths.theme_config.clone(),
            themes_path: self.paths.themes_path.clone(),
            theme_templates_path: self.paths.theme_templates_path.clone(),
            base_templates_path: self.paths.base_templates_path.clone(),
            core_templates_path: self.paths.core_templates_path.clone(),
            plugins_path: self
                .paths
                .plugins_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("node_modules")),
            theme_package_prefix: compile
                .and_then(|c| c.theme_package_prefix.clone())
                .unwrap_or_else(|| DEFAULT_THEME_PACKAGE_PREFIX.to_string()),
            concurrency: compile
                .and_then(|c| c.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
        }
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl PathsConfig {
    fn rebase(&mut self, base: &Path) {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        join(&mut self.views_dir);
        join(&mut self.theme_config);
        join(&mut self.themes_path);
        join(&mut self.core_templates_path);
        if let Some(path) = self.theme_templates_path.as_mut() {
            join(path);
        }
        if let Some(path) = self.base_templates_path.as_mut() {
            join(path);
        }
        if let Some(path) = self.plugins_path.as_mut() {
            join(path);
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.settings().validate()
    }
}
