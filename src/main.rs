use anyhow::Context;
use clap::Parser;
use template_compiler::domain::model::PluginData;
use template_compiler::utils::error::{ErrorSeverity, TemplateError};
use template_compiler::utils::{logger, validation::Validate};
use template_compiler::{
    CliConfig, CompilerSettings, JsonThemeConfigLoader, LocalFileSystem, StaticPluginRegistry,
    TemplateCompiler, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting template compiler");

    // 載入配置：設定檔優先，否則使用命令列參數
    let (settings, declared_plugins, monitor) = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
            let monitor = args.monitor || config.monitoring_enabled();
            (config.settings(), config.plugins.clone(), monitor)
        }
        None => (args.settings(), Vec::new(), args.monitor),
    };

    if args.verbose {
        tracing::debug!("Compiler settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        exit_with(&e, "Configuration validation failed");
    }

    if monitor {
        tracing::info!("🔍 Phase monitoring enabled");
    }

    match run(settings, declared_plugins, monitor).await {
        Ok(()) => Ok(()),
        Err(e) => exit_with(&e, "Template compilation failed"),
    }
}

async fn run(
    settings: CompilerSettings,
    declared_plugins: Vec<PluginData>,
    monitor: bool,
) -> template_compiler::Result<()> {
    let mut registry = StaticPluginRegistry::discover(&settings.plugins_path).await?;
    registry.extend(declared_plugins);
    tracing::debug!("{} plugins registered", registry.len());

    let compiler = TemplateCompiler::new_with_monitoring(
        LocalFileSystem::new(),
        JsonThemeConfigLoader::new(),
        registry,
        settings,
        monitor,
    )?;

    let report = compiler.compile().await?;

    println!(
        "✅ Compiled {} templates from {} directories in {:?}",
        report.templates_written,
        report.template_dirs.len(),
        report.elapsed
    );
    if !report.missing_partials.is_empty() {
        println!(
            "⚠️  {} import(s) were elided, see warnings above",
            report.missing_partials.len()
        );
    }
    Ok(())
}

fn exit_with(e: &TemplateError, context: &str) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
