//! Subcommand resolution.
//!
//! Walks the specification tree one layer at a time. Each layer is consumed
//! and fully decoded before its child is visited, so a failure in an
//! ancestor always wins over anything a descendant would report. Group
//! values computed at a layer are passed down by value to every descendant
//! that embeds them.

use std::collections::BTreeMap;

use command_args_core::CommandSpec;
use serde::Serialize;
use tracing::debug;

use crate::consume::consume;
use crate::decode::decode_layer;
use crate::error::{FailureKind, ParseFailure, Result};
use crate::token::Token;
use crate::values::{ArgumentValues, FromValue};

/// A parsed command layer and, if one was invoked, its subcommand.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
/// use command_args_parser::parse;
///
/// let spec = CommandSpec::new("tool")
///     .with_group(OptionGroup::new("global").with_argument(ArgumentSpec::flag("verbose", &["-v"])))
///     .with_subcommand(
///         CommandSpec::new("build")
///             .embed_group("global")
///             .with_argument(ArgumentSpec::positional("target")),
///     );
///
/// let parsed = parse(&spec, ["-v", "build", "release"]).unwrap();
/// assert_eq!(parsed.path(), vec!["tool", "build"]);
///
/// let build = parsed.leaf();
/// assert_eq!(build.get::<String>("target").unwrap(), "release");
/// assert!(build.group("global").unwrap().get::<bool>("verbose").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    /// Declared name of the command.
    pub name: String,
    /// Decoded values of the command's own arguments.
    pub arguments: ArgumentValues,
    /// Values of declared and embedded groups, keyed by group name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, ArgumentValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<Box<ParsedCommand>>,
    /// Token that selected this command (name or alias).
    #[serde(skip)]
    invoked_as: String,
    /// Raw tokens consumed at this layer, in reading order.
    #[serde(skip)]
    consumed: Vec<String>,
}

impl ParsedCommand {
    /// Converts one of the command's own argument values.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        self.arguments
            .get(name)
            .map_err(|failure| failure.in_command(&[self.name.clone()]))
    }

    /// Returns the values of a declared or embedded group.
    pub fn group(&self, name: &str) -> Result<&ArgumentValues> {
        self.groups.get(name).ok_or_else(|| {
            ParseFailure::new(FailureKind::MissingArgument)
                .named(name)
                .in_command(&[self.name.clone()])
        })
    }

    pub fn subcommand(&self) -> Option<&ParsedCommand> {
        self.subcommand.as_deref()
    }

    /// Name of the invoked subcommand, used to dispatch to a typed variant.
    pub fn subcommand_name(&self) -> Option<&str> {
        self.subcommand().map(|s| s.name.as_str())
    }

    /// Returns the deepest invoked command.
    pub fn leaf(&self) -> &ParsedCommand {
        let mut current = self;
        while let Some(next) = current.subcommand() {
            current = next;
        }
        current
    }

    /// Names of the invoked commands, root first.
    pub fn path(&self) -> Vec<&str> {
        let mut path = vec![self.name.as_str()];
        let mut current = self;
        while let Some(next) = current.subcommand() {
            path.push(next.name.as_str());
            current = next;
        }
        path
    }

    /// Re-serializes the bound tokens in the order they were consumed.
    ///
    /// Parsing the returned tokens against the same spec yields an equal
    /// value.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = self.consumed.clone();
        if let Some(sub) = self.subcommand() {
            tokens.push(sub.invoked_as.clone());
            tokens.extend(sub.to_tokens());
        }
        tokens
    }
}

/// Resolves `tokens` against the tree rooted at `root`.
///
/// The tree is expected to have passed validation; a dangling group
/// reference is still reported as [`FailureKind::InvalidSpecification`].
pub fn resolve(root: &CommandSpec, tokens: &[Token]) -> Result<ParsedCommand> {
    let mut path = Vec::new();
    resolve_layer(root, &root.name, tokens, &BTreeMap::new(), &mut path)
}

fn resolve_layer(
    spec: &CommandSpec,
    invoked_as: &str,
    tokens: &[Token],
    inherited: &BTreeMap<String, ArgumentValues>,
    path: &mut Vec<String>,
) -> Result<ParsedCommand> {
    path.push(spec.name.clone());
    debug!(command = %path.join(" "), tokens = tokens.len(), "resolving command layer");

    let outcome = consume(spec, tokens).map_err(|failure| failure.in_command(path.as_slice()))?;
    let declared: Vec<&str> = spec.groups.iter().map(|g| g.name.as_str()).collect();
    let decoded =
        decode_layer(&outcome.bindings, &declared).map_err(|failure| failure.in_command(path.as_slice()))?;

    let mut groups = BTreeMap::new();
    for name in &spec.embedded_groups {
        let values = inherited.get(name).ok_or_else(|| {
            ParseFailure::new(FailureKind::InvalidSpecification)
                .named(name)
                .in_command(path.as_slice())
        })?;
        groups.insert(name.clone(), values.clone());
    }

    let subcommand = match outcome.handoff {
        Some(handoff) => {
            let mut passed_down = inherited.clone();
            passed_down.extend(decoded.groups.clone());
            let child = resolve_layer(
                handoff.child,
                &handoff.name_token.raw,
                handoff.remaining,
                &passed_down,
                path,
            )?;
            Some(Box::new(child))
        }
        None => None,
    };
    path.pop();

    groups.extend(decoded.groups);
    Ok(ParsedCommand {
        name: spec.name.clone(),
        arguments: decoded.arguments,
        groups,
        subcommand,
        invoked_as: invoked_as.to_string(),
        consumed: outcome.consumed.iter().map(|t| t.raw.clone()).collect(),
    })
}
