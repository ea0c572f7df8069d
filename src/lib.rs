pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
mod testing;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, CompilerSettings};

pub use adapters::{JsonThemeConfigLoader, LocalFileSystem, StaticPluginRegistry};
pub use core::{compiler::TemplateCompiler, imports::ImportResolver};
pub use utils::error::{Result, TemplateError};
