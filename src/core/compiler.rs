use crate::core::imports::ImportResolver;
use crate::core::indexer::build_template_index;
use crate::core::template_dirs::resolve_template_dirs;
use crate::core::{ConfigProvider, FileSystem, PluginRegistry, ThemeConfigLoader};
use crate::domain::model::{CompileReport, MissingPartial, TemplateIndex};
use crate::utils::error::{Result, TemplateError};
use crate::utils::monitor::CompileMonitor;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::{Mutex, PoisonError};

/// Rebuilds the compiled views directory from the layered template sources.
pub struct TemplateCompiler<F, L, R, C>
where
    F: FileSystem,
    L: ThemeConfigLoader,
    R: PluginRegistry,
    C: ConfigProvider,
{
    fs: F,
    loader: L,
    registry: R,
    config: C,
    resolver: ImportResolver,
    monitor_enabled: bool,
}

impl<F, L, R, C> TemplateCompiler<F, L, R, C>
where
    F: FileSystem,
    L: ThemeConfigLoader,
    R: PluginRegistry,
    C: ConfigProvider,
{
    pub fn new(fs: F, loader: L, registry: R, config: C) -> Result<Self> {
        Self::new_with_monitoring(fs, loader, registry, config, false)
    }

    pub fn new_with_monitoring(
        fs: F,
        loader: L,
        registry: R,
        config: C,
        monitor_enabled: bool,
    ) -> Result<Self> {
        Ok(Self {
            fs,
            loader,
            registry,
            config,
            resolver: ImportResolver::new()?,
            monitor_enabled,
        })
    }

    /// Runs one compile: reset the output root, resolve directories, index, then
    /// resolve and write every template. The first fatal error aborts the run.
    pub async fn compile(&self) -> Result<CompileReport> {
        let mut monitor = CompileMonitor::new(self.monitor_enabled);
        let views_dir = self.config.views_dir();

        // 先清空輸出目錄，完成前不得寫入
        self.fs.remove_dir_all(views_dir).await?;
        self.fs.create_dir_all(views_dir).await?;
        monitor.finish_phase("reset output");

        let template_dirs =
            resolve_template_dirs(&self.fs, &self.loader, &self.registry, &self.config).await?;
        tracing::debug!("Template directories: {:?}", template_dirs.as_slice());
        monitor.finish_phase("resolve directories");

        let index = build_template_index(&self.fs, &template_dirs, self.config.concurrency()).await?;
        tracing::debug!("Indexed {} templates", index.len());
        monitor.finish_phase("index templates");

        let missing = Mutex::new(Vec::new());
        let written = self.write_templates(&index, &missing).await?;
        monitor.finish_phase("write templates");

        let missing_partials = missing.into_inner().unwrap_or_else(PoisonError::into_inner);
        if !missing_partials.is_empty() {
            tracing::warn!("{} partial import(s) could not be loaded", missing_partials.len());
        }
        tracing::info!(
            "✅ [templates] Successfully compiled {} templates into {}",
            written,
            views_dir.display()
        );

        Ok(CompileReport {
            template_dirs,
            templates_written: written,
            missing_partials,
            elapsed: monitor.elapsed(),
        })
    }

    async fn write_templates(
        &self,
        index: &TemplateIndex,
        missing: &Mutex<Vec<MissingPartial>>,
    ) -> Result<usize> {
        let views_dir = self.config.views_dir();

        let written: Vec<()> = stream::iter(index.iter())
            .map(|(name, path)| async move {
                let source = self.fs.read_to_string(path).await?;
                let resolved = self.resolver.resolve(&self.fs, index, name, source).await?;

                let target = views_dir.join(name);
                if let Some(parent) = target.parent() {
                    self.fs.create_dir_all(parent).await?;
                }
                self.fs.write(&target, &resolved.source).await?;
                tracing::debug!("Compiled {}", name);

                if !resolved.missing.is_empty() {
                    missing
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend(resolved.missing);
                }
                Ok::<(), TemplateError>(())
            })
            .buffer_unordered(self.config.concurrency().max(1))
            .try_collect()
            .await?;

        Ok(written.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticPluginRegistry;
    use crate::config::CompilerSettings;
    use crate::domain::model::{MissingPartialReason, PluginData};
    use crate::testing::{MapThemeLoader, MemoryFileSystem};
    use std::path::{Path, PathBuf};

    fn settings() -> CompilerSettings {
        CompilerSettings::new(
            "/build/views",
            "/themes/child/theme.json",
            "/themes",
            "/src/views",
        )
        .with_plugins_path("/node_modules")
        .with_concurrency(4)
    }

    fn loader() -> MapThemeLoader {
        MapThemeLoader::new()
            .with_theme("/themes/child/theme.json", Some("parent"))
            .with_theme("/themes/parent/theme.json", None)
    }

    fn compiler(
        fs: &MemoryFileSystem,
        registry: StaticPluginRegistry,
    ) -> TemplateCompiler<MemoryFileSystem, MapThemeLoader, StaticPluginRegistry, CompilerSettings> {
        TemplateCompiler::new(fs.clone(), loader(), registry, settings()).unwrap()
    }

    #[tokio::test]
    async fn test_compile_resolves_overrides_and_imports() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/page.tpl", "<!-- IMPORT partials/header.tpl -->body");
        fs.add_file("/src/views/partials/header.tpl", "core header");
        fs.add_file("/themes/parent/templates/partials/header.tpl", "parent header");
        fs.add_file("/themes/child/templates/partials/header.tpl", "child header");
        fs.add_file("/node_modules/nodebb-plugin-x/templates/admin/plugins/x.tpl", "x");

        let registry = StaticPluginRegistry::new(vec![PluginData::new("nodebb-plugin-x")]);
        let report = compiler(&fs, registry).compile().await.unwrap();

        assert_eq!(report.templates_written, 3);
        assert_eq!(report.template_dirs.len(), 4);
        assert!(report.missing_partials.is_empty());
        assert_eq!(
            fs.file("/build/views/page.tpl").as_deref(),
            Some("child headerbody")
        );
        assert_eq!(
            fs.file("/build/views/partials/header.tpl").as_deref(),
            Some("child header")
        );
        assert_eq!(
            fs.file("/build/views/admin/plugins/x.tpl").as_deref(),
            Some("x")
        );
    }

    #[tokio::test]
    async fn test_compile_clears_stale_output() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/a.tpl", "a");
        fs.add_file("/build/views/stale.tpl", "old");

        compiler(&fs, StaticPluginRegistry::default()).compile().await.unwrap();

        assert_eq!(
            fs.files_under("/build/views"),
            vec![PathBuf::from("/build/views/a.tpl")]
        );
    }

    #[tokio::test]
    async fn test_missing_partials_do_not_fail_compile() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/a.tpl", "x<!-- IMPORT ghost.tpl -->y");

        let report = compiler(&fs, StaticPluginRegistry::default())
            .compile()
            .await
            .unwrap();

        assert_eq!(fs.file("/build/views/a.tpl").as_deref(), Some("xy"));
        assert_eq!(report.missing_partials.len(), 1);
        assert_eq!(report.missing_partials[0].template, "a.tpl");
        assert_eq!(report.missing_partials[0].reason, MissingPartialReason::NotFound);
    }

    #[tokio::test]
    async fn test_missing_partials_from_every_template_are_reported() {
        let fs = MemoryFileSystem::new();
        for name in ["a", "b", "c", "d", "e", "f"] {
            fs.add_file(
                format!("/src/views/{}.tpl", name),
                "<!-- IMPORT ghost.tpl --><!-- IMPORT phantom.tpl -->",
            );
        }

        let report = compiler(&fs, StaticPluginRegistry::default())
            .compile()
            .await
            .unwrap();

        assert_eq!(report.templates_written, 6);
        assert_eq!(report.missing_partials.len(), 12);
    }

    #[tokio::test]
    async fn test_write_failure_aborts_compile() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/a.tpl", "a");
        fs.add_file("/src/views/b.tpl", "b");
        fs.fail_writes_to("/build/views/b.tpl");

        let err = compiler(&fs, StaticPluginRegistry::default())
            .compile()
            .await
            .unwrap_err();

        match err {
            TemplateError::FilesystemError { operation, path, .. } => {
                assert_eq!(operation, "write");
                assert_eq!(path, Path::new("/build/views/b.tpl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_theme_config_aborts_after_reset() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/a.tpl", "a");
        fs.add_file("/build/views/old.tpl", "old");

        let compiler = TemplateCompiler::new(
            fs.clone(),
            MapThemeLoader::new(),
            StaticPluginRegistry::default(),
            settings(),
        )
        .unwrap();
        let err = compiler.compile().await.unwrap_err();

        assert!(matches!(err, TemplateError::ConfigNotFound { .. }));
        assert!(fs.files_under("/build/views").is_empty());
    }

    #[tokio::test]
    async fn test_compile_twice_is_identical() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/views/a.tpl", "<!-- IMPORT b.tpl --><!-- IMPORT c.tpl -->");
        fs.add_file("/src/views/b.tpl", "b");
        fs.add_file("/themes/child/templates/c.tpl", "c");

        let compiler = compiler(&fs, StaticPluginRegistry::default());
        compiler.compile().await.unwrap();
        let first: Vec<_> = fs
            .files_under("/build/views")
            .into_iter()
            .map(|path| (fs.file(&path), path))
            .collect();

        compiler.compile().await.unwrap();
        let second: Vec<_> = fs
            .files_under("/build/views")
            .into_iter()
            .map(|path| (fs.file(&path), path))
            .collect();

        assert_eq!(first, second);
        assert_eq!(fs.file("/build/views/a.tpl").as_deref(), Some("bc"));
    }
}
