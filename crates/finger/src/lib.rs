pub mod config;
pub mod walk;

pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use walk::Walker;
