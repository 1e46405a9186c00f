use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension trait for `Path` used when paths end up inside generated files.
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path
    /// contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use modelctx::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("server.py");
    /// assert_eq!(path.to_str_checked().unwrap(), "server.py");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Resolves a relative path against the current working directory.
    /// The path does not need to exist.
    fn to_absolute(&self) -> Result<PathBuf>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_absolute(&self) -> Result<PathBuf> {
        if self.is_absolute() {
            return Ok(self.to_path_buf());
        }
        Ok(std::env::current_dir()?.join(self))
    }
}
