use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Template files carry this suffix; everything else in a template directory is ignored.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Directory used when a theme or plugin does not declare `templates`.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// File name of a theme's configuration inside its root directory.
pub const THEME_CONFIG_FILE: &str = "theme.json";

/// File name of a plugin's manifest inside its root directory.
pub const PLUGIN_CONFIG_FILE: &str = "plugin.json";

/// 主題設定檔 (theme.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "baseTheme")]
    pub base_theme: Option<String>,
    #[serde(default)]
    pub templates: Option<String>,
}

impl ThemeConfig {
    pub fn templates_dir(&self, theme_root: &Path) -> PathBuf {
        theme_root.join(self.templates.as_deref().unwrap_or(DEFAULT_TEMPLATES_DIR))
    }
}

/// 外掛資料 (plugin.json 或設定檔宣告)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginData {
    pub id: String,
    #[serde(default)]
    pub templates: Option<String>,
}

impl PluginData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            templates: None,
        }
    }

    pub fn with_templates(mut self, templates: impl Into<String>) -> Self {
        self.templates = Some(templates.into());
        self
    }

    pub fn templates_dir(&self, plugins_path: &Path) -> PathBuf {
        plugins_path
            .join(&self.id)
            .join(self.templates.as_deref().unwrap_or(DEFAULT_TEMPLATES_DIR))
    }

    pub fn is_theme(&self, theme_package_prefix: &str) -> bool {
        self.id.starts_with(theme_package_prefix)
    }
}

/// Ordered, deduplicated template directories. Later entries override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDirectoryList {
    dirs: Vec<PathBuf>,
}

impl TemplateDirectoryList {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.dirs
    }
}

impl<'a> IntoIterator for &'a TemplateDirectoryList {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

/// Logical template name (forward-slash relative path) to absolute source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl TemplateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`, replacing whatever an earlier directory supplied.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.entries.insert(name.into(), path.into())
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Looks `name` up as written, then with the template suffix appended, returning the
    /// matching logical name and its source.
    pub fn lookup(&self, name: &str) -> Option<(&str, &Path)> {
        let entry = self.entries.get_key_value(name).or_else(|| {
            if name.ends_with(TEMPLATE_SUFFIX) {
                None
            } else {
                self.entries.get_key_value(format!("{}{}", name, TEMPLATE_SUFFIX).as_str())
            }
        })?;
        Some((entry.0.as_str(), entry.1.as_path()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPartialReason {
    /// The partial name is not in the template index.
    NotFound,
    /// The template tried to import itself.
    SelfImport,
    /// The partial is already being expanded on this substitution path.
    Cycle,
}

impl fmt::Display for MissingPartialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPartialReason::NotFound => write!(f, "not found"),
            MissingPartialReason::SelfImport => write!(f, "self import"),
            MissingPartialReason::Cycle => write!(f, "import cycle"),
        }
    }
}

/// An import directive that was elided instead of substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPartial {
    pub template: String,
    pub partial: String,
    pub reason: MissingPartialReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResolution {
    pub source: String,
    pub missing: Vec<MissingPartial>,
}

#[derive(Debug, Clone)]
pub struct CompileReport {
    pub template_dirs: TemplateDirectoryList,
    pub templates_written: usize,
    pub missing_partials: Vec<MissingPartial>,
    pub elapsed: Duration,
}
