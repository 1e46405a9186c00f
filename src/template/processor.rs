use std::path::Path;

use log::{debug, info};

use crate::{
    error::{Error, Result},
    template::operation::FileOperation,
};

/// Applies file operations to disk.
///
/// Existing files are replaced, never merged. In dry-run mode every operation
/// is logged and nothing is touched.
pub struct FileProcessor {
    dry_run: bool,
}

impl FileProcessor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Applies the operations in order, stopping at the first failure.
    pub fn apply_all(&self, operations: &[FileOperation]) -> Result<()> {
        for operation in operations {
            self.apply(operation)?;
            info!("{}", operation.get_message(self.dry_run));
        }
        Ok(())
    }

    pub fn apply(&self, operation: &FileOperation) -> Result<()> {
        debug!("Handling file operation: {}", operation.error_context());
        match operation {
            FileOperation::CreateDirectory { target, target_exists } => {
                if !target_exists {
                    self.create_dir_all(target)?;
                }
                Ok(())
            }
            FileOperation::Write { target, content, .. } => self.write_file(content, target),
        }
    }

    /// Write content to a file, creating parent directories if needed.
    fn write_file(&self, content: &str, dest_path: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }

        if let Some(parent) = dest_path.parent() {
            self.create_dir_all(parent)?;
        }

        std::fs::write(dest_path, content)
            .map_err(|source| Error::Write { path: dest_path.to_path_buf(), source })
    }

    /// Create directory and all parent directories if they don't exist.
    fn create_dir_all(&self, dest_path: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }

        std::fs::create_dir_all(dest_path)
            .map_err(|source| Error::Write { path: dest_path.to_path_buf(), source })
    }
}
