use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;

use super::{AnyBackend, ApiBackend, DatabaseBackend, FilesystemBackend};
use crate::{
    config::{BackendConfig, BackendType},
    error::{Error, Result},
};

/// Builds a backend from its configuration.
pub type BackendFactory = fn(BackendConfig) -> Result<AnyBackend>;

/// A registered backend and how to construct it.
#[derive(Debug, Clone, Copy)]
pub struct BackendEntry {
    pub backend_type: BackendType,
    pub description: &'static str,
    pub factory: BackendFactory,
}

/// Maps backend tags to their constructors.
///
/// The registry is an ordinary value: build it once with
/// [`BackendRegistry::builtin`] and pass it to whatever needs to resolve tags.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: IndexMap<BackendType, BackendEntry>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every backend shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(BackendEntry {
            backend_type: BackendType::Filesystem,
            description: "Local file access with sandboxed paths",
            factory: |config| FilesystemBackend::new(config).map(AnyBackend::Filesystem),
        });
        registry.register(BackendEntry {
            backend_type: BackendType::Api,
            description: "REST API proxy with authentication and rate limiting",
            factory: |config| ApiBackend::new(config).map(AnyBackend::Api),
        });
        registry.register(BackendEntry {
            backend_type: BackendType::Database,
            description: "SQL databases through SQLAlchemy (sqlite, postgresql, mysql)",
            factory: |config| DatabaseBackend::new(config).map(AnyBackend::Database),
        });
        registry
    }

    /// Registers an entry, replacing any previous entry for the same tag.
    pub fn register(&mut self, entry: BackendEntry) {
        debug!("Registering backend '{}'", entry.backend_type);
        self.entries.insert(entry.backend_type, entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &BackendEntry> {
        self.entries.values()
    }

    /// Comma separated list of the registered tags.
    pub fn available(&self) -> String {
        self.entries.keys().map(BackendType::as_str).collect::<Vec<_>>().join(", ")
    }

    /// Resolves a tag to a registered backend type.
    pub fn resolve(&self, tag: &str) -> Result<BackendType> {
        BackendType::from_str(tag)
            .ok()
            .filter(|backend_type| self.entries.contains_key(backend_type))
            .ok_or_else(|| Error::UnknownBackend {
                backend: tag.to_string(),
                available: self.available(),
            })
    }

    /// Constructs the backend named by the configuration's tag.
    pub fn create(&self, config: BackendConfig) -> Result<AnyBackend> {
        let backend_type = config.backend_type();
        let entry = self.entries.get(&backend_type).ok_or_else(|| Error::UnknownBackend {
            backend: backend_type.to_string(),
            available: self.available(),
        })?;
        (entry.factory)(config)
    }
}
