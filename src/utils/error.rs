use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Theme configuration not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Theme inheritance cycle detected at '{theme}'")]
    ConfigCycleDetected { theme: String },

    #[error("Filesystem error while trying to {operation} {}: {source}", path.display())]
    FilesystemError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid directive pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Filesystem,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TemplateError {
    pub fn filesystem(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::FilesystemError {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TemplateError::ConfigNotFound { .. }
            | TemplateError::ConfigCycleDetected { .. }
            | TemplateError::TomlError(_)
            | TemplateError::ConfigError { .. }
            | TemplateError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            TemplateError::FilesystemError { .. } => ErrorCategory::Filesystem,
            TemplateError::PatternError(_) | TemplateError::TaskError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Filesystem => match self {
                // 權限或磁碟問題，重試無效
                TemplateError::FilesystemError { source, .. }
                    if source.kind() == std::io::ErrorKind::PermissionDenied =>
                {
                    ErrorSeverity::Critical
                }
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TemplateError::ConfigNotFound { .. } => {
                "Check that the theme and every base theme it names are installed under themes_path"
            }
            TemplateError::ConfigCycleDetected { .. } => {
                "Remove the circular baseTheme reference from the theme configuration"
            }
            TemplateError::FilesystemError { .. } => {
                "Verify the output directory is writable and the template directories are readable, then recompile"
            }
            TemplateError::TomlError(_) => "Fix the TOML syntax of the configuration file",
            TemplateError::ConfigError { .. } => {
                "Fix the theme configuration JSON or review the configuration values"
            }
            TemplateError::InvalidConfigValueError { .. } => "Review the configuration values and try again",
            TemplateError::PatternError(_) | TemplateError::TaskError(_) => {
                "This is an internal error; rerun with --verbose and report it"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TemplateError::ConfigNotFound { path } => {
                format!("Theme configuration is missing: {}", path.display())
            }
            TemplateError::ConfigCycleDetected { theme } => {
                format!("Theme '{}' inherits from itself", theme)
            }
            TemplateError::FilesystemError { operation, path, .. } => {
                format!("Could not {} {}", operation, path.display())
            }
            other => other.to_string(),
        }
    }
}
