//! `requirements.txt` assembly.

use indexmap::IndexMap;

use crate::{
    config::{Settings, Transport},
    constants::{BASELINE_DEPENDENCIES, SSE_DEPENDENCIES, TEST_DEPENDENCIES},
};

/// Normalised package name of a requirement specifier.
///
/// ```
/// use modelctx::generator::manifest::package_name;
///
/// assert_eq!(package_name("Python_Dotenv>=1.0.0"), "python-dotenv");
/// assert_eq!(package_name("uvicorn[standard]>=0.23"), "uvicorn");
/// ```
pub fn package_name(specifier: &str) -> String {
    let end = specifier
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(specifier.len());
    specifier[..end].to_ascii_lowercase().replace(['_', '.'], "-")
}

/// Builds the manifest: protocol runtime first, then transport, backend and
/// caller dependencies, and the test runner last.
///
/// A package listed twice keeps its first position and the last specifier.
pub fn build_manifest(
    settings: &Settings,
    backend_dependencies: &[String],
    extra_dependencies: &[String],
) -> String {
    let transport: &[&str] = match settings.transport {
        Transport::Stdio => &[],
        Transport::Sse => SSE_DEPENDENCIES,
    };

    let mut packages: IndexMap<String, String> = IndexMap::new();
    let specifiers = BASELINE_DEPENDENCIES
        .iter()
        .chain(transport)
        .map(|s| s.to_string())
        .chain(backend_dependencies.iter().cloned())
        .chain(extra_dependencies.iter().cloned())
        .chain(TEST_DEPENDENCIES.iter().map(|s| s.to_string()));

    for specifier in specifiers {
        let specifier = specifier.trim().to_string();
        if specifier.is_empty() {
            continue;
        }
        packages.insert(package_name(&specifier), specifier);
    }

    let mut manifest = packages.into_values().collect::<Vec<_>>().join("\n");
    manifest.push('\n');
    manifest
}
