//! In-memory port implementations shared by unit tests.

use crate::domain::model::ThemeConfig;
use crate::domain::ports::{FileSystem, ThemeConfigLoader};
use crate::utils::error::{Result, TemplateError};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
    fail_writes: Arc<Mutex<Option<PathBuf>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: &str) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.lock().unwrap().insert(path, contents.to_string());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    /// Any write to `path` fails with a permission error.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        *self.fail_writes.lock().unwrap() = Some(path.into());
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn files_under(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .filter(|path| path.starts_with(dir.as_ref()))
            .cloned()
            .collect()
    }
}

impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
    }

    async fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.dirs.lock().unwrap().contains(dir) {
            return Err(TemplateError::filesystem(
                "walk",
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        Ok(self.files_under(dir))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path).ok_or_else(|| {
            TemplateError::filesystem(
                "read",
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.fail_writes.lock().unwrap().as_deref() == Some(path) {
            return Err(TemplateError::filesystem(
                "write",
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        let parent_exists = path
            .parent()
            .map(|parent| self.dirs.lock().unwrap().contains(parent))
            .unwrap_or(true);
        if !parent_exists {
            return Err(TemplateError::filesystem(
                "write",
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "parent directory missing"),
            ));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().retain(|file, _| !file.starts_with(path));
        self.dirs.lock().unwrap().retain(|dir| !dir.starts_with(path));
        Ok(())
    }
}

/// Theme configs keyed by the path of their `theme.json`.
#[derive(Default)]
pub struct MapThemeLoader {
    configs: HashMap<PathBuf, ThemeConfig>,
}

impl MapThemeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, config_file: impl Into<PathBuf>, base_theme: Option<&str>) -> Self {
        self.configs.insert(
            config_file.into(),
            ThemeConfig {
                base_theme: base_theme.map(str::to_string),
                ..ThemeConfig::default()
            },
        );
        self
    }

    pub fn with_config(mut self, config_file: impl Into<PathBuf>, config: ThemeConfig) -> Self {
        self.configs.insert(config_file.into(), config);
        self
    }
}

#[async_trait]
impl ThemeConfigLoader for MapThemeLoader {
    async fn load(&self, config_file: &Path) -> Result<ThemeConfig> {
        self.configs
            .get(config_file)
            .cloned()
            .ok_or_else(|| TemplateError::ConfigNotFound {
                path: config_file.to_path_buf(),
            })
    }
}
