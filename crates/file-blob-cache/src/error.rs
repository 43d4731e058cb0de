//! Error types for the file blob cache

use std::fmt;
use std::path::PathBuf;

/// Errors that make a store unusable.
///
/// Per-operation I/O failures are not represented here: they are logged and
/// reported as `false`/`None` by the store methods.
#[derive(Debug)]
pub enum CacheError {
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    NotADirectory(PathBuf),
    Config(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::CreateDir { path, source } => {
                write!(f, "Failed to create cache directory {:?}: {}", path, source)
            }
            CacheError::NotADirectory(path) => {
                write!(f, "Cache path is not a directory: {:?}", path)
            }
            CacheError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_create_dir_error_display_and_source() {
        let err = CacheError::CreateDir {
            path: PathBuf::from("/nope/cache"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/nope/cache"));
        assert!(msg.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err = CacheError::Config("unknown hash mode: md5".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: unknown hash mode: md5"
        );
        assert!(err.source().is_none());
    }
}
