//! Error conversion helpers
//!
//! Attaches the action and the file involved to any foreign error.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting foreign results into `ApplicationResult` with context.
pub trait ResultExt<T> {
    /// Add path context to an error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(path)
    ///     .with_path_context("read records", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{} {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_path_context_keeps_source() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .with_path_context("read records", Path::new("/tmp/members.toml"))
            .unwrap_err();

        assert_eq!(err.to_string(), "operation failed: read records /tmp/members.toml");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("gone"));
    }
}
