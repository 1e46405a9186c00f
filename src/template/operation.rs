use std::path::{Path, PathBuf};

/// A single filesystem change that makes up a generated project.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    CreateDirectory { target: PathBuf, target_exists: bool },
    Write { target: PathBuf, content: String, target_exists: bool },
}

impl FileOperation {
    pub fn create_directory(target: impl Into<PathBuf>) -> Self {
        let target = target.into();
        let target_exists = target.is_dir();
        FileOperation::CreateDirectory { target, target_exists }
    }

    pub fn write(target: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let target = target.into();
        let target_exists = target.exists();
        FileOperation::Write { target, content: content.into(), target_exists }
    }

    /// Returns the target path for this operation, used for error context.
    pub fn target_path(&self) -> &Path {
        match self {
            FileOperation::CreateDirectory { target, .. } => target,
            FileOperation::Write { target, .. } => target,
        }
    }

    /// Rendered content, for writes.
    pub fn content(&self) -> Option<&str> {
        match self {
            FileOperation::Write { content, .. } => Some(content),
            FileOperation::CreateDirectory { .. } => None,
        }
    }

    /// Returns a brief description of this operation for error messages.
    pub fn error_context(&self) -> String {
        match self {
            FileOperation::CreateDirectory { target, .. } => {
                format!("create directory '{}'", target.display())
            }
            FileOperation::Write { target, .. } => {
                format!("write '{}'", target.display())
            }
        }
    }

    /// Gets a message describing the operation and its status.
    ///
    /// # Arguments
    /// * `dry_run` - Whether this is a dry run (no actual file operations)
    pub fn get_message(&self, dry_run: bool) -> String {
        let prefix = if dry_run { "[DRY RUN] " } else { "" };

        match self {
            FileOperation::CreateDirectory { target, target_exists } => {
                if *target_exists {
                    format!(
                        "{}Skipping directory creation '{}' (already exists)",
                        prefix,
                        target.display()
                    )
                } else {
                    format!("{}Creating directory '{}'", prefix, target.display())
                }
            }
            FileOperation::Write { target, target_exists, .. } => {
                if *target_exists {
                    format!(
                        "{}Writing to '{}' (overwriting existing file)",
                        prefix,
                        target.display()
                    )
                } else {
                    format!("{}Writing to '{}'", prefix, target.display())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_directory_skips_when_exists() {
        let target = PathBuf::from("/tmp/test/dir");
        let expected =
            format!("Skipping directory creation '{}' (already exists)", target.display());
        let op = FileOperation::CreateDirectory { target, target_exists: true };
        assert_eq!(op.get_message(false), expected);
    }

    #[test]
    fn create_directory_message_when_missing() {
        let target = PathBuf::from("/tmp/test/dir");
        let expected = format!("Creating directory '{}'", target.display());
        let op = FileOperation::CreateDirectory { target, target_exists: false };
        assert_eq!(op.get_message(false), expected);
    }

    #[test]
    fn write_operation_overwrite_message() {
        let target = PathBuf::from("/tmp/test/server.py");
        let expected = format!("Writing to '{}' (overwriting existing file)", target.display());
        let op = FileOperation::Write { target, content: String::new(), target_exists: true };
        assert_eq!(op.get_message(false), expected);
    }

    #[test]
    fn write_operation_basic_message() {
        let target = PathBuf::from("/tmp/test/server.py");
        let expected = format!("Writing to '{}'", target.display());
        let op = FileOperation::Write { target, content: String::new(), target_exists: false };
        assert_eq!(op.get_message(false), expected);
    }

    #[test]
    fn test_dry_run_messages() {
        let op = FileOperation::Write {
            target: PathBuf::from("/tmp/test/README.md"),
            content: "# readme".to_string(),
            target_exists: false,
        };
        let dry_run_message = op.get_message(true);
        let normal_message = op.get_message(false);

        assert!(dry_run_message.starts_with("[DRY RUN] "));
        assert!(!normal_message.starts_with("[DRY RUN] "));
        assert_eq!(dry_run_message, format!("[DRY RUN] {normal_message}"));
    }

    #[test]
    fn constructors_detect_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.py");
        std::fs::write(&file, "x = 1\n").unwrap();

        assert!(matches!(
            FileOperation::create_directory(dir.path()),
            FileOperation::CreateDirectory { target_exists: true, .. }
        ));
        assert!(matches!(
            FileOperation::write(&file, "y = 2\n"),
            FileOperation::Write { target_exists: true, .. }
        ));
        assert!(matches!(
            FileOperation::write(dir.path().join("new.py"), ""),
            FileOperation::Write { target_exists: false, .. }
        ));
    }

    #[test]
    fn error_context_includes_target() {
        let op = FileOperation::write("/output/tests/test_server.py", "");
        let context = op.error_context();
        assert!(context.contains("write"));
        assert!(context.contains("/output/tests/test_server.py"));
        assert_eq!(op.target_path(), Path::new("/output/tests/test_server.py"));

        let op = FileOperation::create_directory("/output/config");
        assert!(op.error_context().contains("create directory"));
        assert_eq!(op.content(), None);
    }
}
