//! Specification document loading.
//!
//! Documents are JSON or YAML, chosen by file extension (`.yaml`/`.yml` are
//! YAML, anything else JSON).
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0.0"
//! command:
//!   name: outer
//!   groups:
//!     - name: outer
//!       arguments:
//!         - name: argument
//!           role: positional
//!           required: true
//!   subcommands:
//!     - name: inner
//!       embedded_groups: [outer]
//!       arguments:
//!         - name: query
//!           role: positional
//!           arity: array
//!           capture: all_unrecognized
//! ```

use std::io::BufReader;
use std::path::Path;

use command_args_core::{SpecDocument, validate_document};
use tracing::debug;

use crate::error::{CliError, Result};

/// On-disk encoding of a specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Loads a specification document without validating it.
///
/// # Errors
///
/// Returns [`IoError`](CliError::IoError) if the file cannot be read, or a
/// JSON/YAML error if decoding fails.
pub fn load_document(path: &Path) -> Result<SpecDocument> {
    let format = DocumentFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading specification document");

    let reader = BufReader::new(std::fs::File::open(path)?);
    let document = match format {
        DocumentFormat::Json => serde_json::from_reader(reader)?,
        DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(document)
}

/// Loads a document and rejects it if validation fails.
///
/// # Errors
///
/// Everything [`load_document`] returns, plus
/// [`InvalidSpec`](CliError::InvalidSpec) for the first validation error.
pub fn load_validated(path: &Path) -> Result<SpecDocument> {
    let document = load_document(path)?;
    match validate_document(&document).into_iter().next() {
        Some(source) => Err(CliError::InvalidSpec {
            path: path.display().to_string(),
            source,
        }),
        None => Ok(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("spec")), DocumentFormat::Json);
    }

    #[test]
    fn test_load_validated_rejects_bad_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"version": "1.0.0", "command": {"name": "tool", "subcommands": [{"name": "a"}, {"name": "a"}]}}"#,
        )
        .unwrap();

        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidSpec { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_document(Path::new("/nonexistent/spec.json")).unwrap_err();
        assert!(matches!(err, CliError::IoError(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
