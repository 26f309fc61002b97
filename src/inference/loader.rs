//! Model file resolution and validation.
//!
//! The application looks for one fixed model file next to its own
//! executable unless an explicit path override is configured. Before the
//! (potentially minutes-long) load starts, the file is checked for
//! existence and for the GGUF magic so obvious mistakes fail fast.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::ModelConfig;

/// Magic bytes at the start of every GGUF file.
pub const GGUF_MAGIC: &[u8; 4] = b"GGUF";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Model file not found!\n\nPlease make sure '{0}' is in the same folder as the application.")]
    FileNotFound(String),

    #[error("Invalid GGUF format: {0}")]
    InvalidFormat(String),

    #[error("Could not determine the application directory")]
    NoExeDir,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Resolve the model path: explicit override if configured, otherwise the
/// fixed filename in the executable's directory.
pub fn resolve_model_path(config: &ModelConfig) -> Result<PathBuf, LoaderError> {
    if let Some(path) = &config.model_path {
        return Ok(path.clone());
    }
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or(LoaderError::NoExeDir)?;
    Ok(dir.join(&config.model_filename))
}

/// Validate that the model file exists and carries the GGUF magic.
pub fn validate_model(path: &Path) -> Result<(), LoaderError> {
    if !path.exists() {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model file")
            .to_string();
        return Err(LoaderError::FileNotFound(filename));
    }

    let mut magic = [0u8; 4];
    let mut file = std::fs::File::open(path)?;
    file.read_exact(&mut magic)
        .map_err(|_| LoaderError::InvalidFormat("file too short for GGUF header".to_string()))?;
    if &magic != GGUF_MAGIC {
        return Err(LoaderError::InvalidFormat(format!(
            "bad magic {magic:02x?}, expected 'GGUF'"
        )));
    }

    let file_size = std::fs::metadata(path)?.len();
    info!(path = %path.display(), file_size, "Model file validated");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_reported_by_name() {
        let err = validate_model(Path::new("/nonexistent/codellama.gguf")).unwrap_err();
        match err {
            LoaderError::FileNotFound(name) => assert_eq!(name, "codellama.gguf"),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gguf");
        std::fs::write(&path, b"NOTGGUF_DATA").unwrap();

        let err = validate_model(&path).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidFormat(_)));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gguf");
        std::fs::write(&path, b"GG").unwrap();

        let err = validate_model(&path).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidFormat(_)));
    }

    #[test]
    fn test_gguf_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gguf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(GGUF_MAGIC).unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        drop(file);

        validate_model(&path).unwrap();
    }

    #[test]
    fn test_explicit_override_wins() {
        let config = ModelConfig {
            model_path: Some(PathBuf::from("/models/custom.gguf")),
            ..ModelConfig::default()
        };
        let path = resolve_model_path(&config).unwrap();
        assert_eq!(path, PathBuf::from("/models/custom.gguf"));
    }

    #[test]
    fn test_default_path_uses_fixed_filename() {
        let config = ModelConfig::default();
        let path = resolve_model_path(&config).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("codellama-7b-instruct.Q4_K_M.gguf")
        );
    }
}
