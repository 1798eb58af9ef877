//! Command implementations for the CLI.

mod config;
mod offset;
mod transform;

pub use config::cmd_config;
pub use offset::cmd_offset;
pub use transform::cmd_transform;
