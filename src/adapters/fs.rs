use crate::domain::ports::FileSystem;
use crate::utils::error::{Result, TemplateError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Local disk implementation of [`FileSystem`] on top of `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let root = dir.to_path_buf();

        // walkdir 是同步 API，放到 blocking 執行緒
        tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
            let mut files = Vec::new();
            for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
                let entry = entry.map_err(|err| {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    TemplateError::filesystem("walk", path, err.into())
                })?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Ok(files)
        })
        .await?
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| TemplateError::filesystem("read", path, err))?;

        // 編碼錯誤不算讀取失敗，無效位元組以 U+FFFD 取代
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Template {} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        })
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|err| TemplateError::filesystem("write", path, err))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|err| TemplateError::filesystem("create", path, err))
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TemplateError::filesystem("remove", path, err)),
        }
    }
}
