pub mod compiler;
pub mod imports;
pub mod indexer;
pub mod template_dirs;
pub mod theme_chain;

pub use crate::domain::model::{
    CompileReport, ImportResolution, MissingPartial, MissingPartialReason, TemplateDirectoryList,
    TemplateIndex,
};
pub use crate::domain::ports::{ConfigProvider, FileSystem, PluginRegistry, ThemeConfigLoader};
pub use crate::utils::error::Result;
