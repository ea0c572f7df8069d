// Adapters layer: concrete implementations of the domain ports (local disk, theme.json, plugin manifests).

pub mod fs;
pub mod plugins;
pub mod theme_loader;

pub use fs::LocalFileSystem;
pub use plugins::StaticPluginRegistry;
pub use theme_loader::JsonThemeConfigLoader;
