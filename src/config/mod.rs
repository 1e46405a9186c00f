//! Configuration values handed to the generator
//!
//! - `types`: backend tags, transports and global settings
//! - `backend`: the per-backend configuration value
//! - `project`: the project configuration wrapping a backend configuration
//! - `loader`: project files read from YAML or JSON

pub mod backend;
pub mod loader;
pub mod project;
pub mod types;

pub use backend::BackendConfig;
pub use loader::{ProjectFile, ProjectFileV1};
pub use project::ProjectConfig;
pub use types::{BackendType, LogLevel, Settings, Transport};
