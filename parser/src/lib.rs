//! Command-line argument parsing over a specification tree.
//!
//! Given the invocation arguments (without the program name) and a
//! [`CommandSpec`] tree, this crate produces either a [`ParsedCommand`] tree
//! of typed values or the first [`ParseFailure`] encountered.
//!
//! The pipeline has five stages:
//!
//! - [`TokenStream`]: lexical classification (option-like, positional-like,
//!   terminator).
//! - [`consume`]: binds one command layer's tokens to its argument specs,
//!   applying arity and catch-all capture rules.
//! - [`resolve`]: walks into subcommands and hands group values down.
//! - [`decode`]: coerces raw tokens to typed values and applies defaults.
//! - [`ParseFailure`]: structured, located failure reporting.
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//! use command_args_parser::Parser;
//!
//! let spec = CommandSpec::new("outer")
//!     .with_group(OptionGroup::new("outer").with_argument(ArgumentSpec::positional("argument")))
//!     .with_subcommand(
//!         CommandSpec::new("inner")
//!             .embed_group("outer")
//!             .with_argument(ArgumentSpec::positional("first").integer())
//!             .with_argument(ArgumentSpec::option("feature", &["--feature"]).integer().array())
//!             .with_argument(
//!                 ArgumentSpec::positional("query").capture(CaptureStrategy::AllUnrecognized),
//!             ),
//!     );
//!
//! let parser = Parser::new(spec).unwrap();
//! let parsed = parser
//!     .parse(["outer", "inner", "24", "--enable", "example", "--feature", "1", "--final"])
//!     .unwrap();
//!
//! let inner = parsed.leaf();
//! assert_eq!(inner.group("outer").unwrap().get::<String>("argument").unwrap(), "outer");
//! assert_eq!(inner.get::<i64>("first").unwrap(), 24);
//! assert_eq!(inner.get::<Vec<i64>>("feature").unwrap(), vec![1]);
//! assert_eq!(
//!     inner.get::<Vec<String>>("query").unwrap(),
//!     vec!["--enable", "example", "--final"]
//! );
//! ```

pub mod consume;
pub mod decode;
mod error;
pub mod resolve;
mod token;
mod values;

use command_args_core::{CommandSpec, validate_command};
use tracing::debug;

pub use consume::{Binding, Handoff, LayerOutcome, consume};
pub use error::{FailureKind, ParseFailure, Result};
pub use resolve::{ParsedCommand, resolve};
pub use token::{TERMINATOR, Token, TokenKind, TokenStream};
pub use values::{ArgumentValues, FromValue};

/// A validated specification tree ready to parse invocations.
///
/// Parsing takes `&self` and keeps no state between calls, so one parser can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct Parser {
    spec: CommandSpec,
}

impl Parser {
    /// Validates `spec` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`FailureKind::AmbiguousSubcommand`] for colliding subcommand
    /// names and [`FailureKind::InvalidSpecification`] for any other
    /// validation error.
    pub fn new(spec: CommandSpec) -> Result<Self> {
        check(&spec)?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Parses invocation arguments (without the program name).
    pub fn parse<I, S>(&self, args: I) -> Result<ParsedCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stream = TokenStream::new(args);
        resolve(&self.spec, stream.tokens())
    }
}

/// Validates `spec` and parses `args` against it in one call.
pub fn parse<I, S>(spec: &CommandSpec, args: I) -> Result<ParsedCommand>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    check(spec)?;
    let stream = TokenStream::new(args);
    resolve(spec, stream.tokens())
}

fn check(spec: &CommandSpec) -> Result<()> {
    match validate_command(spec).into_iter().next() {
        Some(err) => {
            debug!(command = %spec.name, error = %err, "specification rejected");
            Err(err.into())
        }
        None => Ok(()),
    }
}

/// A Rust type that can be built from a parse of its own specification.
///
/// Implementations register their arguments explicitly in [`spec`] and read
/// them back in [`from_parsed`]; subcommands are dispatched by matching
/// [`ParsedCommand::subcommand_name`] onto an enum variant.
///
/// [`spec`]: ParsableCommand::spec
/// [`from_parsed`]: ParsableCommand::from_parsed
pub trait ParsableCommand: Sized {
    /// Builds the specification tree for this command.
    fn spec() -> CommandSpec;

    /// Reads typed fields out of a parse result.
    fn from_parsed(parsed: &ParsedCommand) -> Result<Self>;

    /// Parses `args` and converts the result.
    fn parse_from<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parsed = parse(&Self::spec(), args)?;
        Self::from_parsed(&parsed)
    }
}
