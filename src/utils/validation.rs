use crate::core::ConfigProvider;
use crate::utils::error::{Result, TemplateError};
use std::path::Path;

pub const MAX_CONCURRENCY: usize = 1024;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();

    if path.as_os_str().is_empty() {
        return Err(TemplateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.into_owned(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(TemplateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.into_owned(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TemplateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TemplateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// The output root is deleted on every compile, so it must not hold any template source.
pub fn validate_output_root(views_dir: &Path, sources: &[(&str, &Path)]) -> Result<()> {
    for (field, source) in sources {
        if source.starts_with(views_dir) {
            return Err(TemplateError::InvalidConfigValueError {
                field: "views_dir".to_string(),
                value: views_dir.to_string_lossy().into_owned(),
                reason: format!("Output directory contains {} ({})", field, source.display()),
            });
        }
    }
    Ok(())
}

pub fn validate_compiler_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("views_dir", config.views_dir())?;
    validate_path("theme_config", config.theme_config())?;
    validate_path("themes_path", config.themes_path())?;
    validate_path("core_templates_path", config.core_templates_path())?;
    validate_path("plugins_path", config.plugins_path())?;
    if let Some(path) = config.theme_templates_path() {
        validate_path("theme_templates_path", path)?;
    }
    if let Some(path) = config.base_templates_path() {
        validate_path("base_templates_path", path)?;
    }

    validate_non_empty_string("theme_package_prefix", config.theme_package_prefix())?;
    validate_range("concurrency", config.concurrency(), 1, MAX_CONCURRENCY)?;

    let mut sources = vec![
        ("core_templates_path", config.core_templates_path()),
        ("themes_path", config.themes_path()),
        ("plugins_path", config.plugins_path()),
    ];
    if let Some(theme_root) = config.theme_config().parent() {
        if !theme_root.as_os_str().is_empty() {
            sources.push(("theme_config", theme_root));
        }
    }
    if let Some(path) = config.theme_templates_path() {
        sources.push(("theme_templates_path", path));
    }
    if let Some(path) = config.base_templates_path() {
        sources.push(("base_templates_path", path));
    }
    validate_output_root(config.views_dir(), &sources)
}
