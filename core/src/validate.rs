//! Specification tree validation.
//!
//! Validates the structural guarantees the parser relies on, catching errors
//! such as colliding option names, misplaced catch-all positionals, dangling
//! group references, and colliding subcommand names before any token is
//! consumed.
//!
//! # Examples
//!
//! ```
//! use command_args_core::*;
//!
//! let spec = CommandSpec::new("tool")
//!     .with_argument(ArgumentSpec::flag("verbose", &["-v", "--verbose"]));
//! assert!(validate_command(&spec).is_empty());
//!
//! // Invalid: short name missing its leading dash
//! let bad = CommandSpec::new("tool")
//!     .with_argument(ArgumentSpec::flag("verbose", &["v"]));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::{
    ArgumentRole, ArgumentSpec, Arity, CaptureStrategy, CommandSpec, LayoutEntry, OptionGroup,
    SpecDocument, Value,
};

/// Specification validation errors.
///
/// Each variant describes a specific structural problem. The `Display` impl
/// provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Document version string is empty.
    #[error("document version cannot be empty")]
    EmptyDocumentVersion,
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Argument field name is empty or whitespace-only.
    #[error("argument name cannot be empty in command: {0}")]
    EmptyArgumentName(String),
    /// An option or flag has no spelling.
    #[error("option must define at least one name: {0}")]
    MissingOptionName(String),
    /// Short name does not look like `-x`.
    #[error("invalid short option format: {0}")]
    InvalidShortName(String),
    /// Long name does not look like `--name`.
    #[error("invalid long option format: {0}")]
    InvalidLongName(String),
    /// Two options visible at the same command share a spelling.
    #[error("duplicate option name in scope: {0}")]
    DuplicateOptionName(String),
    /// Two arguments at the same command share a field name.
    #[error("duplicate argument in scope: {0}")]
    DuplicateArgument(String),
    /// Two subcommands in the same scope share a name or alias.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A group is declared twice along one path.
    #[error("duplicate group along path: {0}")]
    DuplicateGroup(String),
    /// A command embeds a group no ancestor declares.
    #[error("embedded group is not declared by an ancestor: {0}")]
    UnknownGroup(String),
    /// More than one catch-all positional at one command.
    #[error("multiple catch-all positionals in command: {0}")]
    MultipleCatchAll(String),
    /// A catch-all positional is followed by another positional.
    #[error("catch-all positional must be the last positional: {0}")]
    CatchAllNotLast(String),
    /// A catch-all positional is not array-valued.
    #[error("catch-all positional must be an array: {0}")]
    CatchAllArity(String),
    /// A capture strategy was set on an option or flag.
    #[error("capture strategy is only valid on positionals: {0}")]
    CaptureOnNonPositional(String),
    /// A positional can never receive a token given the ones before it.
    #[error("positional can never be bound: {0}")]
    UnreachablePositional(String),
    /// A default value does not match the declared type.
    #[error("default value does not match declared type: {0}")]
    DefaultTypeMismatch(String),
}

/// Validates a specification document.
///
/// Checks for an empty version string, then validates the command tree.
pub fn validate_document(document: &SpecDocument) -> Vec<ValidationError> {
    if document.version.trim().is_empty() {
        return vec![ValidationError::EmptyDocumentVersion];
    }
    validate_command(&document.command)
}

/// Validates a command specification tree.
///
/// Stops at the first problem found, so the returned vector holds at most
/// one error.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// // Subcommand embeds a group nobody declares
/// let spec = CommandSpec::new("tool").with_subcommand(CommandSpec::new("run").embed_group("global"));
/// let errors = validate_command(&spec);
/// assert!(matches!(errors[0], ValidationError::UnknownGroup(_)));
/// ```
pub fn validate_command(spec: &CommandSpec) -> Vec<ValidationError> {
    let mut path = Vec::new();
    let mut available = BTreeMap::new();
    match check_command(spec, &mut path, &mut available) {
        Ok(()) => Vec::new(),
        Err(err) => vec![err],
    }
}

fn check_command<'a>(
    spec: &'a CommandSpec,
    path: &mut Vec<String>,
    available: &mut BTreeMap<&'a str, &'a OptionGroup>,
) -> Result<(), ValidationError> {
    let name = spec.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCommandName);
    }

    path.push(name.to_string());
    let scope = path.join(" ");

    let mut embedded: Vec<&OptionGroup> = Vec::new();
    for group_name in &spec.embedded_groups {
        let group = available
            .get(group_name.as_str())
            .ok_or_else(|| ValidationError::UnknownGroup(format!("{scope}: {group_name}")))?;
        embedded.push(*group);
    }

    let layout = spec.layout();
    check_arguments(&scope, &layout, &embedded)?;
    check_positionals(&layout)?;

    let mut declared = Vec::new();
    for group in &spec.groups {
        if available.contains_key(group.name.as_str()) || declared.contains(&group.name.as_str()) {
            return Err(ValidationError::DuplicateGroup(format!(
                "{scope}: {}",
                group.name
            )));
        }
        declared.push(group.name.as_str());
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &spec.subcommands {
        for label in std::iter::once(&sub.name).chain(sub.aliases.iter()) {
            if !seen.insert(label.as_str()) {
                return Err(ValidationError::DuplicateSubcommand(format!(
                    "{scope}: {label}"
                )));
            }
        }
    }

    for group in &spec.groups {
        available.insert(group.name.as_str(), group);
    }
    let result = spec
        .subcommands
        .iter()
        .try_for_each(|sub| check_command(sub, path, available));
    for group in &spec.groups {
        available.remove(group.name.as_str());
    }
    path.pop();

    result
}

fn check_arguments(
    scope: &str,
    layout: &[LayoutEntry<'_>],
    embedded: &[&OptionGroup],
) -> Result<(), ValidationError> {
    let mut fields: HashSet<(Option<&str>, &str)> = HashSet::new();
    let mut spellings: HashSet<&str> = HashSet::new();

    for entry in layout {
        let arg = entry.spec;
        if arg.name.trim().is_empty() {
            return Err(ValidationError::EmptyArgumentName(scope.to_string()));
        }
        if !fields.insert((entry.group, arg.name.as_str())) {
            return Err(ValidationError::DuplicateArgument(format!(
                "{scope}: {}",
                arg.name
            )));
        }
        check_names(arg)?;
        check_default(arg)?;
        for spelling in &arg.names {
            if !spellings.insert(spelling.as_str()) {
                return Err(ValidationError::DuplicateOptionName(spelling.clone()));
            }
        }
    }

    for group in embedded {
        for arg in &group.arguments {
            for spelling in &arg.names {
                if !spellings.insert(spelling.as_str()) {
                    return Err(ValidationError::DuplicateOptionName(spelling.clone()));
                }
            }
        }
    }

    Ok(())
}

fn check_names(arg: &ArgumentSpec) -> Result<(), ValidationError> {
    if arg.is_positional() {
        return Ok(());
    }
    if arg.capture != CaptureStrategy::Default {
        return Err(ValidationError::CaptureOnNonPositional(arg.name.clone()));
    }
    if arg.names.is_empty() {
        return Err(ValidationError::MissingOptionName(arg.name.clone()));
    }

    for spelling in &arg.names {
        if spelling.contains('=') {
            if spelling.starts_with("--") {
                return Err(ValidationError::InvalidLongName(spelling.clone()));
            }
            return Err(ValidationError::InvalidShortName(spelling.clone()));
        }
        if spelling.starts_with("--") {
            if spelling.len() < 3 {
                return Err(ValidationError::InvalidLongName(spelling.clone()));
            }
        } else if !spelling.starts_with('-') || spelling.len() < 2 {
            return Err(ValidationError::InvalidShortName(spelling.clone()));
        }
    }

    Ok(())
}

fn check_default(arg: &ArgumentSpec) -> Result<(), ValidationError> {
    let Some(default) = &arg.default else {
        return Ok(());
    };

    let matches = match (arg.role, arg.arity) {
        (ArgumentRole::Flag, Arity::Array) => matches!(default, Value::Integer(_)),
        (ArgumentRole::Flag, _) => matches!(default, Value::Bool(_)),
        (_, Arity::Array) => default
            .as_array()
            .is_some_and(|items| items.iter().all(|v| arg.value_kind.accepts(v))),
        (_, _) => arg.value_kind.accepts(default),
    };

    if matches {
        Ok(())
    } else {
        Err(ValidationError::DefaultTypeMismatch(format!(
            "{} ({} given, {} expected)",
            arg.name,
            default.type_name(),
            arg.value_kind
        )))
    }
}

fn check_positionals(layout: &[LayoutEntry<'_>]) -> Result<(), ValidationError> {
    let positionals: Vec<&ArgumentSpec> = layout
        .iter()
        .map(|e| e.spec)
        .filter(|a| a.is_positional())
        .collect();

    let mut catch_all: Option<&ArgumentSpec> = None;
    let mut open_ended = false;
    let mut optional_seen = false;

    for arg in positionals {
        if let Some(previous) = catch_all {
            if arg.is_catch_all() {
                return Err(ValidationError::MultipleCatchAll(previous.name.clone()));
            }
            return Err(ValidationError::CatchAllNotLast(previous.name.clone()));
        }

        if arg.is_catch_all() {
            if arg.arity != Arity::Array {
                return Err(ValidationError::CatchAllArity(arg.name.clone()));
            }
            catch_all = Some(arg);
            continue;
        }

        if open_ended || (optional_seen && arg.arity == Arity::Single && arg.required) {
            return Err(ValidationError::UnreachablePositional(arg.name.clone()));
        }
        match arg.arity {
            Arity::Array => open_ended = true,
            Arity::OptionalSingle => optional_seen = true,
            Arity::Single if !arg.required => optional_seen = true,
            Arity::Single => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> CommandSpec {
        CommandSpec::new("outer")
            .with_group(OptionGroup::new("outer").with_argument(ArgumentSpec::positional("argument")))
            .with_subcommand(
                CommandSpec::new("inner")
                    .embed_group("outer")
                    .with_argument(ArgumentSpec::positional("first").integer())
                    .with_argument(ArgumentSpec::option("feature", &["--feature"]).integer().array())
                    .with_argument(
                        ArgumentSpec::positional("query").capture(CaptureStrategy::AllUnrecognized),
                    ),
            )
    }

    #[test]
    fn test_validate_accepts_nested_spec() {
        assert!(validate_command(&nested()).is_empty());
    }

    #[test]
    fn test_validate_rejects_collision_with_embedded_group() {
        let spec = CommandSpec::new("tool")
            .with_group(
                OptionGroup::new("global").with_argument(ArgumentSpec::flag("verbose", &["--verbose"])),
            )
            .with_subcommand(
                CommandSpec::new("run")
                    .embed_group("global")
                    .with_argument(ArgumentSpec::flag("loud", &["--verbose"])),
            );

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::DuplicateOptionName("--verbose".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_catch_all_not_last() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("rest").capture(CaptureStrategy::PostTerminator))
            .with_argument(ArgumentSpec::positional("file").optional());

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::CatchAllNotLast("rest".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_two_catch_alls() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("a").capture(CaptureStrategy::AllUnrecognized))
            .with_argument(
                ArgumentSpec::positional("b").capture(CaptureStrategy::UnconditionalRemaining),
            );

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::MultipleCatchAll("a".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_alias() {
        let spec = CommandSpec::new("tool")
            .with_subcommand(CommandSpec::new("remove").with_alias("rm"))
            .with_subcommand(CommandSpec::new("rm"));

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::DuplicateSubcommand("tool: rm".to_string())]
        );
    }

    #[test]
    fn test_validate_allows_ancestor_name_deeper_in_tree() {
        let spec = CommandSpec::new("tool")
            .with_subcommand(CommandSpec::new("config").with_subcommand(CommandSpec::new("tool")));

        assert!(validate_command(&spec).is_empty());
    }

    #[test]
    fn test_validate_rejects_unreachable_positional() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("files").array())
            .with_argument(ArgumentSpec::positional("target"));

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::UnreachablePositional("target".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_mistyped_default() {
        let spec = CommandSpec::new("tool").with_argument(
            ArgumentSpec::option("jobs", &["--jobs"])
                .integer()
                .with_default(Value::String("four".into())),
        );

        assert!(matches!(
            validate_command(&spec).as_slice(),
            [ValidationError::DefaultTypeMismatch(_)]
        ));
    }

    #[test]
    fn test_validate_group_not_visible_to_siblings() {
        let spec = CommandSpec::new("tool")
            .with_subcommand(
                CommandSpec::new("a")
                    .with_group(OptionGroup::new("shared").with_argument(ArgumentSpec::flag("x", &["-x"]))),
            )
            .with_subcommand(CommandSpec::new("b").embed_group("shared"));

        assert_eq!(
            validate_command(&spec),
            vec![ValidationError::UnknownGroup("tool b: shared".to_string())]
        );
    }
}
