use crate::core::FileSystem;
use crate::domain::model::{TemplateDirectoryList, TemplateIndex, TEMPLATE_SUFFIX};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};

/// Logical name of `file` inside `dir`: the relative path with `/` separators.
pub fn logical_name(dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/").replace('\\', "/"))
}

async fn collect_templates<F: FileSystem>(fs: &F, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let files = fs.walk(dir).await?;

    let templates: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter(|file| file.to_string_lossy().ends_with(TEMPLATE_SUFFIX))
        .filter_map(|file| logical_name(dir, &file).map(|name| (name, file)))
        .collect();

    tracing::debug!("Found {} templates in {}", templates.len(), dir.display());
    Ok(templates)
}

/// Walks every directory (concurrently) and merges the results in list order, so a
/// later directory replaces earlier entries with the same logical name.
pub async fn build_template_index<F: FileSystem>(
    fs: &F,
    dirs: &TemplateDirectoryList,
    concurrency: usize,
) -> Result<TemplateIndex> {
    let buckets: Vec<Vec<(String, PathBuf)>> = stream::iter(dirs.iter())
        .map(|dir| collect_templates(fs, dir))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut index = TemplateIndex::new();
    for bucket in buckets {
        for (name, path) in bucket {
            let replacement = path.display().to_string();
            if let Some(previous) = index.insert(name.clone(), path) {
                tracing::debug!(
                    "Template {} overridden: {} -> {}",
                    name,
                    previous.display(),
                    replacement
                );
            }
        }
    }

    Ok(index)
}
