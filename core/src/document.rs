use serde::{Deserialize, Serialize};

use crate::CommandSpec;

/// Serializable wrapper for authoring a specification tree as a file.
///
/// A document pairs a root [`CommandSpec`] with version metadata so that
/// JSON or YAML spec files can be checked for compatibility before use.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let mut document = SpecDocument::new("1.0.0", CommandSpec::new("tool"));
/// document.name = Some("tool-spec".into());
///
/// assert_eq!(document.command.name, "tool");
/// assert_eq!(document.schema_version.as_deref(), Some(SPEC_CONTRACT_VERSION));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Spec contract version (populated from
    /// [`SPEC_CONTRACT_VERSION`](crate::SPEC_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Document version (semver string).
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Root of the specification tree.
    pub command: CommandSpec,
}

impl SpecDocument {
    /// Creates a document with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`SPEC_CONTRACT_VERSION`](crate::SPEC_CONTRACT_VERSION).
    pub fn new(version: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            schema_version: Some(crate::SPEC_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            command,
        }
    }
}
