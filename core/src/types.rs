//! Specification tree definitions.
//!
//! This module defines the static description of a command that the parser
//! consumes: positional arguments, options, flags, option groups, and nested
//! subcommands. The types are plain data built through chained builder
//! methods (or deserialized from a [`SpecDocument`](crate::SpecDocument)) and
//! are never mutated while a parse is running.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the specification document contract (semver).
///
/// Embedded in every [`SpecDocument`](crate::SpecDocument) to track
/// compatibility across document versions.
pub const SPEC_CONTRACT_VERSION: &str = "1.0.0";

/// Primitive type a positional or option value is coerced to.
///
/// Flags ignore this; they always decode to a boolean (or an occurrence
/// count when counted).
///
/// # Examples
///
/// ```
/// use command_args_core::ValueKind;
///
/// assert_eq!(ValueKind::default(), ValueKind::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Raw string value (the default).
    #[default]
    String,
    /// Signed 64-bit integer literal.
    Integer,
}

impl ValueKind {
    /// Returns `true` if `value` is a scalar of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValueKind::String, Value::String(_)) | (ValueKind::Integer, Value::Integer(_))
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::Integer => f.write_str("integer"),
        }
    }
}

/// A decoded argument value, also used for declared defaults.
///
/// Serialized untagged so documents can write defaults naturally
/// (`"default": 3`, `"default": []`).
///
/// # Examples
///
/// ```
/// use command_args_core::Value;
///
/// let v = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
/// assert_eq!(v.as_array().map(|a| a.len()), Some(2));
/// assert_eq!(serde_json::to_string(&v).unwrap(), "[1,2]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Flag presence.
    Bool(bool),
    /// Integer value or flag occurrence count.
    Integer(i64),
    /// String value.
    String(String),
    /// Repeated values in encounter order.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// How many tokens a single argument spec may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly one value (the default).
    #[default]
    Single,
    /// Zero or one value.
    OptionalSingle,
    /// Zero or more values.
    Array,
}

/// How an argument is matched against tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentRole {
    /// Bound by declaration order.
    Positional,
    /// Bound by name, takes a value.
    Option,
    /// Bound by name, takes no value.
    Flag,
}

/// Which otherwise-unclaimed tokens a catch-all positional absorbs.
///
/// Only the last positional of a command may use a strategy other than
/// [`Default`](CaptureStrategy::Default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStrategy {
    /// Ordinary positional binding.
    #[default]
    Default,
    /// Everything left over, with subcommand matching disabled.
    UnconditionalRemaining,
    /// Only tokens after the `--` terminator.
    PostTerminator,
    /// Everything left over, including unmatched option-like tokens.
    AllUnrecognized,
}

/// Specification of a single positional argument, option, or flag.
///
/// Use [`positional`](ArgumentSpec::positional),
/// [`option`](ArgumentSpec::option), or [`flag`](ArgumentSpec::flag) to
/// create a spec, then chain modifiers.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentSpec, Arity, CaptureStrategy, ValueKind};
///
/// let feature = ArgumentSpec::option("feature", &["--feature", "-f"])
///     .integer()
///     .array();
/// assert_eq!(feature.arity, Arity::Array);
/// assert_eq!(feature.value_kind, ValueKind::Integer);
/// assert!(feature.matches("-f"));
/// assert!(!feature.required);
///
/// let query = ArgumentSpec::positional("query").capture(CaptureStrategy::AllUnrecognized);
/// assert!(query.is_catch_all());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Field name the decoded value is stored under.
    pub name: String,
    /// Literal spellings for options and flags (e.g. `--feature`, `-f`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    pub role: ArgumentRole,
    #[serde(default)]
    pub arity: Arity,
    #[serde(default)]
    pub value_kind: ValueKind,
    #[serde(default)]
    pub capture: CaptureStrategy,
    /// Whether parsing fails when the argument is absent and has no default.
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSpec {
    fn new(name: &str, names: &[&str], role: ArgumentRole, required: bool) -> Self {
        Self {
            name: name.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            role,
            arity: Arity::Single,
            value_kind: ValueKind::String,
            capture: CaptureStrategy::Default,
            required,
            default: None,
            description: None,
        }
    }

    /// Creates a required single-value positional argument.
    pub fn positional(name: &str) -> Self {
        Self::new(name, &[], ArgumentRole::Positional, true)
    }

    /// Creates a required single-value option bound by any of `names`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::ArgumentSpec;
    ///
    /// let output = ArgumentSpec::option("output", &["-o", "--output"]);
    /// assert!(output.required);
    /// assert_eq!(output.display_name(), "--output");
    /// ```
    pub fn option(name: &str, names: &[&str]) -> Self {
        Self::new(name, names, ArgumentRole::Option, true)
    }

    /// Creates a boolean flag bound by any of `names`.
    pub fn flag(name: &str, names: &[&str]) -> Self {
        Self::new(name, names, ArgumentRole::Flag, false)
    }

    /// Accepts zero or one value.
    pub fn optional(mut self) -> Self {
        self.arity = Arity::OptionalSingle;
        self.required = false;
        self
    }

    /// Accepts zero or more values, decoding to an empty sequence when absent.
    pub fn array(mut self) -> Self {
        self.arity = Arity::Array;
        self.required = false;
        self
    }

    /// Counts repeated occurrences of a flag.
    pub fn counted(self) -> Self {
        self.array()
    }

    /// Coerces values to integers.
    pub fn integer(mut self) -> Self {
        self.value_kind = ValueKind::Integer;
        self
    }

    /// Declares a fallback value; the argument is no longer required.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    /// Makes this a catch-all positional with the given strategy.
    pub fn capture(mut self, strategy: CaptureStrategy) -> Self {
        self.capture = strategy;
        self.arity = Arity::Array;
        self.required = false;
        self
    }

    /// Fails the parse when the argument is absent.
    ///
    /// Array arguments still decode to an empty sequence when absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn is_positional(&self) -> bool {
        self.role == ArgumentRole::Positional
    }

    /// Returns `true` for a positional with a non-default capture strategy.
    pub fn is_catch_all(&self) -> bool {
        self.is_positional() && self.capture != CaptureStrategy::Default
    }

    /// Checks if `name` is one of this option's spellings.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Name used in diagnostics (long spelling preferred, `<name>` for positionals).
    pub fn display_name(&self) -> String {
        if self.is_positional() {
            return format!("<{}>", self.name);
        }
        self.names
            .iter()
            .find(|n| n.starts_with("--"))
            .or_else(|| self.names.first())
            .cloned()
            .unwrap_or_else(|| self.name.clone())
    }
}

/// A named, reusable bundle of argument specs.
///
/// A command that declares a group binds its arguments at its own layer;
/// descendants that embed the group by name receive the resulting values.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentSpec, OptionGroup};
///
/// let group = OptionGroup::new("global")
///     .with_argument(ArgumentSpec::flag("verbose", &["-v", "--verbose"]));
/// assert_eq!(group.arguments.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

impl OptionGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    /// Adds an argument to the group.
    pub fn with_argument(mut self, arg: ArgumentSpec) -> Self {
        self.arguments.push(arg);
        self
    }
}

/// An argument bound at a command's layer together with the group that
/// declares it (`None` for the command's own arguments).
#[derive(Debug, Clone, Copy)]
pub struct LayoutEntry<'a> {
    pub group: Option<&'a str>,
    pub spec: &'a ArgumentSpec,
}

/// Specification of a command and its subcommand tree.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let spec = CommandSpec::new("outer")
///     .with_group(OptionGroup::new("outer").with_argument(ArgumentSpec::positional("argument")))
///     .with_subcommand(
///         CommandSpec::new("inner")
///             .embed_group("outer")
///             .with_argument(
///                 ArgumentSpec::positional("query").capture(CaptureStrategy::AllUnrecognized),
///             ),
///     );
///
/// assert_eq!(spec.subcommand_names(), vec!["inner"]);
/// assert!(spec.find_subcommand("inner").is_some());
/// assert_eq!(spec.layout().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Name the command is invoked by.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate names accepted when matching a subcommand token.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Own arguments in declaration order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    /// Groups declared and bound at this command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<OptionGroup>,
    /// Names of ancestor-declared groups whose values this command receives.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Creates an empty command spec with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds an argument.
    pub fn with_argument(mut self, arg: ArgumentSpec) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Declares a group bound at this command.
    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Embeds a group declared by an ancestor.
    pub fn embed_group(mut self, name: &str) -> Self {
        self.embedded_groups.push(name.to_string());
        self
    }

    /// Adds a nested subcommand.
    pub fn with_subcommand(mut self, sub: CommandSpec) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Returns `true` if `name` is this command's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Finds a direct subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|s| s.answers_to(name))
    }

    /// Finds a group declared at this command.
    pub fn find_group(&self, name: &str) -> Option<&OptionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Gets all direct subcommand names.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.subcommands.is_empty()
    }

    /// Returns every argument bound at this layer in binding order.
    ///
    /// Declared groups come first, in declaration order, followed by the
    /// command's own arguments. Embedded groups are not part of the layout;
    /// they were bound by the ancestor that declares them.
    pub fn layout(&self) -> Vec<LayoutEntry<'_>> {
        let grouped = self.groups.iter().flat_map(|g| {
            g.arguments.iter().map(move |spec| LayoutEntry {
                group: Some(g.name.as_str()),
                spec,
            })
        });
        let own = self
            .arguments
            .iter()
            .map(|spec| LayoutEntry { group: None, spec });
        grouped.chain(own).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_builder() {
        let opt = ArgumentSpec::option("message", &["-m", "--message"])
            .with_description("Commit message");

        assert_eq!(opt.role, ArgumentRole::Option);
        assert_eq!(opt.arity, Arity::Single);
        assert!(opt.required);
        assert_eq!(opt.display_name(), "--message");
        assert!(opt.matches("-m"));
        assert!(!opt.matches("--msg"));
    }

    #[test]
    fn test_default_clears_required() {
        let arg = ArgumentSpec::positional("count")
            .integer()
            .with_default(Value::Integer(3));

        assert!(!arg.required);
        assert_eq!(arg.display_name(), "<count>");
    }

    #[test]
    fn test_layout_orders_groups_first() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("own"))
            .with_group(OptionGroup::new("common").with_argument(ArgumentSpec::positional("shared")));

        let names: Vec<_> = spec
            .layout()
            .iter()
            .map(|e| (e.group, e.spec.name.as_str()))
            .collect();
        assert_eq!(names, vec![(Some("common"), "shared"), (None, "own")]);
    }

    #[test]
    fn test_find_subcommand_by_alias() {
        let spec = CommandSpec::new("tool").with_subcommand(CommandSpec::new("remove").with_alias("rm"));

        assert_eq!(spec.find_subcommand("rm").map(|s| s.name.as_str()), Some("remove"));
        assert!(spec.find_subcommand("delete").is_none());
    }

    #[test]
    fn test_find_group_only_sees_declared_groups() {
        let spec = CommandSpec::new("tool")
            .with_group(OptionGroup::new("global").with_argument(ArgumentSpec::flag("quiet", &["-q"])))
            .embed_group("outer");

        assert_eq!(spec.find_group("global").map(|g| g.arguments.len()), Some(1));
        assert!(spec.find_group("outer").is_none());
    }

    #[test]
    fn test_value_accessors_match_variant() {
        assert_eq!(Value::Integer(-4).as_integer(), Some(-4));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::String("4".into()).as_integer(), None);
        assert_eq!(Value::Integer(1).as_bool(), None);
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let v: Value = serde_json::from_str(r#"["a", 2, true]"#).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::String("a".into()),
                Value::Integer(2),
                Value::Bool(true)
            ])
        );
    }
}
