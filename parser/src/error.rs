//! Parse failure reporting.
//!
//! Every failure aborts the whole parse; a [`ParseFailure`] carries the
//! offending token's position, the declared name of the spec involved, and
//! the command path where it happened.

use std::fmt;

use command_args_core::{ArgumentSpec, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::token::Token;

/// Category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An option-like token matched no declared name and nothing absorbed it.
    UnrecognizedOption,
    /// A post-terminator token had no positional slot and nothing absorbed it.
    UnrecognizedArgument,
    /// A required argument was not given and has no default.
    MissingArgument,
    /// An option was given without its value.
    MissingValue,
    /// A value could not be coerced to the declared type.
    InvalidValue,
    /// Subcommand names collide in the specification.
    AmbiguousSubcommand,
    /// The specification failed validation for another reason.
    InvalidSpecification,
    /// A positional token had no positional slot and nothing absorbed it.
    UnexpectedArgument,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::UnrecognizedOption => "unrecognized option",
            FailureKind::UnrecognizedArgument => "unrecognized argument",
            FailureKind::MissingArgument => "missing argument",
            FailureKind::MissingValue => "missing value",
            FailureKind::InvalidValue => "invalid value",
            FailureKind::AmbiguousSubcommand => "ambiguous subcommand",
            FailureKind::InvalidSpecification => "invalid specification",
            FailureKind::UnexpectedArgument => "unexpected argument",
        };
        f.write_str(label)
    }
}

/// The first fatal condition encountered during a parse.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentSpec, CommandSpec};
/// use command_args_parser::{FailureKind, parse};
///
/// let spec = CommandSpec::new("tool").with_argument(ArgumentSpec::positional("count").integer());
/// let failure = parse(&spec, ["ten"]).unwrap_err();
///
/// assert_eq!(failure.kind, FailureKind::InvalidValue);
/// assert_eq!(failure.position, Some(0));
/// assert_eq!(failure.spec_name.as_deref(), Some("<count>"));
/// assert_eq!(failure.to_string(), "invalid value 'ten' for <count> at position 0 in tool");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}{}", detail(.token, .spec_name, .position, .command_path, .cause))]
pub struct ParseFailure {
    pub kind: FailureKind,
    /// Index of the offending token in the original argument list.
    pub position: Option<usize>,
    /// Raw text of the offending token.
    pub token: Option<String>,
    /// Declared name of the spec involved (`--name` or `<name>`).
    pub spec_name: Option<String>,
    /// Commands traversed, root first, down to the failing layer.
    pub command_path: Vec<String>,
    /// Validation error behind a specification failure.
    #[source]
    #[serde(skip)]
    pub cause: Option<ValidationError>,
}

fn detail(
    token: &Option<String>,
    spec_name: &Option<String>,
    position: &Option<usize>,
    command_path: &[String],
    cause: &Option<ValidationError>,
) -> String {
    let mut out = String::new();
    if let Some(token) = token {
        out.push_str(&format!(" '{token}'"));
    }
    if let Some(spec_name) = spec_name {
        out.push_str(&format!(" for {spec_name}"));
    }
    if let Some(position) = position {
        out.push_str(&format!(" at position {position}"));
    }
    if !command_path.is_empty() {
        out.push_str(&format!(" in {}", command_path.join(" ")));
    }
    if let Some(cause) = cause {
        out.push_str(&format!(": {cause}"));
    }
    out
}

impl ParseFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            position: None,
            token: None,
            spec_name: None,
            command_path: Vec::new(),
            cause: None,
        }
    }

    /// Attaches the offending token.
    pub fn at(mut self, token: &Token) -> Self {
        self.position = Some(token.position);
        self.token = Some(token.raw.clone());
        self
    }

    /// Attaches the spec's declared name.
    pub fn for_spec(mut self, spec: &ArgumentSpec) -> Self {
        self.spec_name = Some(spec.display_name());
        self
    }

    /// Attaches an arbitrary name (group or field) when no spec is at hand.
    pub fn named(mut self, name: &str) -> Self {
        self.spec_name = Some(name.to_string());
        self
    }

    /// Records the command path, keeping the innermost one already set.
    pub fn in_command(mut self, path: &[String]) -> Self {
        if self.command_path.is_empty() {
            self.command_path = path.to_vec();
        }
        self
    }
}

impl From<ValidationError> for ParseFailure {
    fn from(err: ValidationError) -> Self {
        let kind = match err {
            ValidationError::DuplicateSubcommand(_) => FailureKind::AmbiguousSubcommand,
            _ => FailureKind::InvalidSpecification,
        };
        let mut failure = ParseFailure::new(kind);
        failure.cause = Some(err);
        failure
    }
}

/// Convenience alias for results with [`ParseFailure`].
pub type Result<T> = std::result::Result<T, ParseFailure>;
