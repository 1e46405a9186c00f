/// Backend capability trait and the built-in backends.
pub mod backends;

/// Handles argument parsing.
pub mod cli;

/// Project and backend configuration.
pub mod config;

/// Constants shared across the crate.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// Project rendering and writing.
pub mod generator;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Structural validation of generated Python.
pub mod syntax;

/// Embedded templates and file operations.
pub mod template;

/// Project name and parameter validators.
pub mod validation;
