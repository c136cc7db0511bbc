//! Command implementations.

mod build;
mod dev;
mod presets;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use presets::execute as presets_execute;
