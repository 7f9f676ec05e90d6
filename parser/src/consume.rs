//! Consumption engine.
//!
//! Binds the tokens handed to one command layer to that layer's argument
//! specs in a single left-to-right pass with one token of lookahead:
//!
//! - option-like tokens are matched by name first, at every position;
//! - positional-like tokens fill ordinary positionals in declaration order;
//! - once no ordinary positional is waiting, a token naming a subcommand
//!   ends the layer and everything after it is handed to that child;
//! - whatever is left over goes to the layer's catch-all positional, or
//!   fails the parse; with an absorbing catch-all, a bare value after an
//!   unmatched option is left over together with it.

use command_args_core::{
    ArgumentRole, ArgumentSpec, Arity, CaptureStrategy, CommandSpec, LayoutEntry, ValueKind,
};
use tracing::{debug, trace};

use crate::error::{FailureKind, ParseFailure, Result};
use crate::token::{Token, TokenKind};

/// Raw tokens matched to one argument spec, before decoding.
///
/// For options the tokens are the values (one per occurrence); for flags
/// they are the flag tokens themselves; for positionals they are the bound
/// values in order.
#[derive(Debug, Clone)]
pub struct Binding<'s> {
    pub spec: &'s ArgumentSpec,
    /// Group declaring the spec, `None` for the command's own arguments.
    pub group: Option<&'s str>,
    pub tokens: Vec<Token>,
}

impl<'s> Binding<'s> {
    fn new(entry: &LayoutEntry<'s>) -> Self {
        Self {
            spec: entry.spec,
            group: entry.group,
            tokens: Vec::new(),
        }
    }
}

/// Transition to a child command found at a subcommand boundary.
#[derive(Debug, Clone)]
pub struct Handoff<'s, 't> {
    pub child: &'s CommandSpec,
    /// The token that named the child (its name or an alias).
    pub name_token: &'t Token,
    /// Every token after the name token, in original order.
    pub remaining: &'t [Token],
}

/// Result of consuming one command layer.
#[derive(Debug, Clone)]
pub struct LayerOutcome<'s, 't> {
    /// One binding per layout entry, in binding order.
    pub bindings: Vec<Binding<'s>>,
    /// Tokens consumed by this layer, in the order they were read.
    pub consumed: &'t [Token],
    pub handoff: Option<Handoff<'s, 't>>,
}

struct Layer<'s> {
    spec: &'s CommandSpec,
    layout: Vec<LayoutEntry<'s>>,
    /// Layout indices of ordinary positionals in declaration order.
    positionals: Vec<usize>,
    catch_all: Option<usize>,
}

impl<'s> Layer<'s> {
    fn new(spec: &'s CommandSpec) -> Self {
        let layout = spec.layout();
        let positionals = layout
            .iter()
            .enumerate()
            .filter(|(_, e)| e.spec.is_positional() && !e.spec.is_catch_all())
            .map(|(i, _)| i)
            .collect();
        let catch_all = layout.iter().position(|e| e.spec.is_catch_all());
        Self {
            spec,
            layout,
            positionals,
            catch_all,
        }
    }

    fn strategy(&self) -> Option<CaptureStrategy> {
        self.catch_all.map(|i| self.layout[i].spec.capture)
    }

    fn find_option(&self, name: &str) -> Option<usize> {
        self.layout
            .iter()
            .position(|e| !e.spec.is_positional() && e.spec.matches(name))
    }

    fn subcommand_matching(&self) -> bool {
        !self.spec.is_leaf() && self.strategy() != Some(CaptureStrategy::UnconditionalRemaining)
    }

    /// Whether the catch-all absorbs `token` once the pass is over.
    fn claims(&self, token: &Token) -> bool {
        match self.strategy() {
            Some(CaptureStrategy::PostTerminator) => token.terminated,
            Some(_) => true,
            None => false,
        }
    }

    /// Whether `next` is the would-be value of the unmatched `option` and
    /// should be left over with it.
    fn sweeps_value(&self, option: &Token, next: &Token) -> bool {
        let absorbing = matches!(
            self.strategy(),
            Some(CaptureStrategy::AllUnrecognized | CaptureStrategy::UnconditionalRemaining)
        );
        absorbing
            && option.attached_value().is_none()
            && next.kind == TokenKind::PositionalLike
            && !next.terminated
            && !(self.subcommand_matching() && self.spec.find_subcommand(&next.raw).is_some())
    }
}

/// Consumes `tokens` against a single command layer.
///
/// Subcommands are not descended into; a boundary is reported through
/// [`LayerOutcome::handoff`] for the resolver to follow.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
/// use command_args_parser::{TokenStream, consume};
///
/// let spec = CommandSpec::new("tool")
///     .with_argument(ArgumentSpec::positional("target"))
///     .with_subcommand(CommandSpec::new("run"));
/// let stream = TokenStream::new(["here", "run", "--fast"]);
///
/// let outcome = consume(&spec, stream.tokens()).unwrap();
/// assert_eq!(outcome.bindings[0].tokens[0].raw, "here");
/// let handoff = outcome.handoff.unwrap();
/// assert_eq!(handoff.child.name, "run");
/// assert_eq!(handoff.remaining.len(), 1);
/// ```
pub fn consume<'s, 't>(spec: &'s CommandSpec, tokens: &'t [Token]) -> Result<LayerOutcome<'s, 't>> {
    let layer = Layer::new(spec);
    let mut bindings: Vec<Binding<'s>> = layer.layout.iter().map(Binding::new).collect();
    let mut next_positional = 0usize;
    let mut leftovers: Vec<&'t Token> = Vec::new();
    let mut cursor = 0usize;

    while cursor < tokens.len() {
        let token = &tokens[cursor];

        match token.kind {
            TokenKind::Terminator => {
                trace!(position = token.position, "terminator");
                cursor += 1;
                continue;
            }
            TokenKind::OptionLike => {
                match layer.find_option(token.option_name()) {
                    Some(index) => match bind_option(&mut bindings[index], tokens, cursor) {
                        Ok(next) => cursor = next,
                        // An earlier rejected leftover is reported first.
                        Err(failure) => {
                            return Err(first_rejected(&layer, &leftovers).unwrap_or(failure));
                        }
                    },
                    None => {
                        trace!(token = %token.raw, "unmatched option-like token deferred");
                        leftovers.push(token);
                        cursor += 1;
                        let swept = tokens.get(cursor).filter(|next| layer.sweeps_value(token, next));
                        if let Some(value) = swept {
                            trace!(token = %value.raw, "value of unmatched option deferred");
                            leftovers.push(value);
                            cursor += 1;
                        }
                    }
                }
                continue;
            }
            TokenKind::PositionalLike => {}
        }

        let current = layer.positionals.get(next_positional).copied();
        if let Some(index) = current {
            if bindings[index].spec.arity != Arity::Array {
                trace!(token = %token.raw, argument = %bindings[index].spec.name, "positional bound");
                bindings[index].tokens.push(token.clone());
                next_positional += 1;
                cursor += 1;
                continue;
            }
        }

        if !token.terminated && layer.subcommand_matching() {
            if let Some(child) = spec.find_subcommand(&token.raw) {
                debug!(
                    command = %spec.name,
                    subcommand = %child.name,
                    position = token.position,
                    "subcommand boundary"
                );
                let handoff = Handoff {
                    child,
                    name_token: token,
                    remaining: &tokens[cursor + 1..],
                };
                return finish(&layer, bindings, leftovers, &tokens[..cursor], Some(handoff));
            }
        }

        match current {
            Some(index) => bindings[index].tokens.push(token.clone()),
            None => leftovers.push(token),
        }
        cursor += 1;
    }

    finish(&layer, bindings, leftovers, tokens, None)
}

/// Binds an option or flag occurrence at `cursor`, returning the next cursor.
fn bind_option(binding: &mut Binding<'_>, tokens: &[Token], cursor: usize) -> Result<usize> {
    let token = &tokens[cursor];
    let spec = binding.spec;

    if spec.role == ArgumentRole::Flag {
        if token.attached_value().is_some() {
            return Err(ParseFailure::new(FailureKind::InvalidValue)
                .at(token)
                .for_spec(spec));
        }
        trace!(flag = %spec.name, "flag bound");
        binding.tokens.push(token.clone());
        return Ok(cursor + 1);
    }

    if let Some(value) = token.attached_value() {
        binding.tokens.push(token.attached(value));
        return Ok(cursor + 1);
    }

    match tokens.get(cursor + 1) {
        Some(next) if accepts_value(spec, next) => {
            trace!(option = %spec.name, value = %next.raw, "option bound");
            binding.tokens.push(next.clone());
            Ok(cursor + 2)
        }
        _ => Err(ParseFailure::new(FailureKind::MissingValue)
            .at(token)
            .for_spec(spec)),
    }
}

fn accepts_value(spec: &ArgumentSpec, next: &Token) -> bool {
    if next.terminated {
        return false;
    }
    match next.kind {
        TokenKind::PositionalLike => true,
        TokenKind::OptionLike => spec.value_kind == ValueKind::Integer && next.is_negative_number(),
        TokenKind::Terminator => false,
    }
}

fn finish<'s, 't>(
    layer: &Layer<'s>,
    mut bindings: Vec<Binding<'s>>,
    leftovers: Vec<&'t Token>,
    consumed: &'t [Token],
    handoff: Option<Handoff<'s, 't>>,
) -> Result<LayerOutcome<'s, 't>> {
    if let Some(failure) = first_rejected(layer, &leftovers) {
        return Err(failure);
    }

    if let Some(index) = layer.catch_all {
        if !leftovers.is_empty() {
            debug!(
                command = %layer.spec.name,
                argument = %bindings[index].spec.name,
                count = leftovers.len(),
                "catch-all absorbed leftover tokens"
            );
        }
        bindings[index].tokens.extend(leftovers.into_iter().cloned());
    }

    Ok(LayerOutcome {
        bindings,
        consumed,
        handoff,
    })
}

/// Failure for the first leftover the catch-all will not absorb.
fn first_rejected(layer: &Layer<'_>, leftovers: &[&Token]) -> Option<ParseFailure> {
    let token = leftovers.iter().copied().find(|t| !layer.claims(t))?;
    let kind = if token.is_option_like() {
        FailureKind::UnrecognizedOption
    } else if token.terminated {
        FailureKind::UnrecognizedArgument
    } else {
        FailureKind::UnexpectedArgument
    };
    debug!(command = %layer.spec.name, token = %token.raw, %kind, "leftover token rejected");
    Some(ParseFailure::new(kind).at(token))
}

#[cfg(test)]
mod tests {
    use command_args_core::OptionGroup;

    use super::*;
    use crate::TokenStream;

    fn raws(binding: &Binding<'_>) -> Vec<String> {
        binding.tokens.iter().map(|t| t.raw.clone()).collect()
    }

    fn catch_all_spec(strategy: CaptureStrategy) -> CommandSpec {
        CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("first"))
            .with_argument(ArgumentSpec::flag("verbose", &["-v", "--verbose"]))
            .with_argument(ArgumentSpec::positional("rest").capture(strategy))
            .with_subcommand(CommandSpec::new("sub"))
    }

    #[test]
    fn test_option_matched_before_positional() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("file"))
            .with_argument(ArgumentSpec::option("mode", &["--mode"]));
        let stream = TokenStream::new(["--mode", "fast", "input.txt"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["input.txt"]);
        assert_eq!(raws(&outcome.bindings[1]), vec!["fast"]);
    }

    #[test]
    fn test_array_option_keeps_every_occurrence() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::option("tag", &["-t", "--tag"]).array());
        let stream = TokenStream::new(["-t", "a", "--tag=b", "-t", "a"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_missing_option_value() {
        let spec = CommandSpec::new("tool").with_argument(ArgumentSpec::option("mode", &["--mode"]));
        let stream = TokenStream::new(["--mode", "--", "fast"]);

        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingValue);
        assert_eq!(failure.position, Some(0));
        assert_eq!(failure.spec_name.as_deref(), Some("--mode"));
    }

    #[test]
    fn test_integer_option_accepts_negative_value() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::option("offset", &["--offset"]).integer());
        let stream = TokenStream::new(["--offset", "-3"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["-3"]);
    }

    #[test]
    fn test_flag_rejects_attached_value() {
        let spec = CommandSpec::new("tool").with_argument(ArgumentSpec::flag("verbose", &["--verbose"]));
        let stream = TokenStream::new(["--verbose=yes"]);

        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidValue);
    }

    #[test]
    fn test_all_unrecognized_sweeps_option_and_value() {
        let spec = catch_all_spec(CaptureStrategy::AllUnrecognized);
        let stream = TokenStream::new(["one", "--include", "a", "-v", "--", "--x"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["one"]);
        assert_eq!(raws(&outcome.bindings[1]), vec!["-v"]);
        assert_eq!(raws(&outcome.bindings[2]), vec!["--include", "a", "--x"]);
        assert!(outcome.handoff.is_none());
    }

    #[test]
    fn test_value_after_unmatched_option_skips_positionals() {
        let spec = catch_all_spec(CaptureStrategy::AllUnrecognized);
        let stream = TokenStream::new(["--include", "a", "one", "--only=b", "two"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["one"]);
        assert_eq!(raws(&outcome.bindings[2]), vec!["--include", "a", "--only=b", "two"]);
    }

    #[test]
    fn test_earlier_leftover_reported_before_missing_value() {
        let spec = CommandSpec::new("tool").with_argument(ArgumentSpec::option("mode", &["--mode"]));
        let stream = TokenStream::new(["--bogus", "--mode"]);

        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnrecognizedOption);
        assert_eq!(failure.position, Some(0));

        let spec = spec.with_argument(ArgumentSpec::positional("rest").capture(CaptureStrategy::AllUnrecognized));
        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingValue);
        assert_eq!(failure.position, Some(1));
    }

    #[test]
    fn test_all_unrecognized_still_matches_subcommand() {
        let spec = catch_all_spec(CaptureStrategy::AllUnrecognized);
        let stream = TokenStream::new(["one", "--include", "sub", "two"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[2]), vec!["--include"]);
        let handoff = outcome.handoff.unwrap();
        assert_eq!(handoff.child.name, "sub");
        assert_eq!(handoff.remaining[0].raw, "two");
        assert_eq!(outcome.consumed.len(), 2);
    }

    #[test]
    fn test_unconditional_remaining_disables_subcommands() {
        let spec = catch_all_spec(CaptureStrategy::UnconditionalRemaining);
        let stream = TokenStream::new(["one", "sub", "--other"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert!(outcome.handoff.is_none());
        assert_eq!(raws(&outcome.bindings[2]), vec!["sub", "--other"]);
    }

    #[test]
    fn test_post_terminator_only_claims_terminated_tokens() {
        let spec = catch_all_spec(CaptureStrategy::PostTerminator);

        let stream = TokenStream::new(["one", "--", "--raw", "sub"]);
        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[2]), vec!["--raw", "sub"]);
        assert!(outcome.handoff.is_none());

        let stream = TokenStream::new(["one", "--stray", "--", "x"]);
        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnrecognizedOption);
        assert_eq!(failure.position, Some(1));
    }

    #[test]
    fn test_post_terminator_tokens_fill_positionals_first() {
        let spec = catch_all_spec(CaptureStrategy::PostTerminator);
        let stream = TokenStream::new(["--", "-one", "two"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["-one"]);
        assert_eq!(raws(&outcome.bindings[2]), vec!["two"]);
    }

    #[test]
    fn test_leftover_failure_kinds() {
        let spec = CommandSpec::new("tool").with_argument(ArgumentSpec::positional("only"));

        let stream = TokenStream::new(["a", "b"]);
        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnexpectedArgument);
        assert_eq!(failure.token.as_deref(), Some("b"));

        let stream = TokenStream::new(["a", "--", "b"]);
        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnrecognizedArgument);
        assert_eq!(failure.position, Some(2));

        let stream = TokenStream::new(["--nope", "a"]);
        let failure = consume(&spec, stream.tokens()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnrecognizedOption);
    }

    #[test]
    fn test_array_positional_yields_to_subcommand_name() {
        let spec = CommandSpec::new("tool")
            .with_argument(ArgumentSpec::positional("files").array())
            .with_subcommand(CommandSpec::new("then"));
        let stream = TokenStream::new(["a", "b", "then", "c"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(raws(&outcome.bindings[0]), vec!["a", "b"]);
        assert_eq!(outcome.handoff.unwrap().child.name, "then");
    }

    #[test]
    fn test_group_arguments_bind_at_declaring_layer() {
        let spec = CommandSpec::new("tool")
            .with_group(OptionGroup::new("global").with_argument(ArgumentSpec::flag("quiet", &["-q"])))
            .with_argument(ArgumentSpec::positional("target"));
        let stream = TokenStream::new(["x", "-q"]);

        let outcome = consume(&spec, stream.tokens()).unwrap();
        assert_eq!(outcome.bindings[0].group, Some("global"));
        assert_eq!(raws(&outcome.bindings[0]), vec!["-q"]);
        assert_eq!(raws(&outcome.bindings[1]), vec!["x"]);
    }
}
