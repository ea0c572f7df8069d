// Domain layer: template models and ports (interfaces to the filesystem, theme configs, plugins).

pub mod model;
pub mod ports;
