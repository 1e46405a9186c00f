//! Template rendering for generated sources
//!
//! - `interface`: the `TemplateRenderer` trait
//! - `minijinja`: the MiniJinja-backed implementation
//! - `filters`: custom filters for emitting Python

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use interface::TemplateRenderer;
pub use minijinja::MiniJinjaRenderer;
