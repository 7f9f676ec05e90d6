//! Specification tree types for command-line argument parsing.
//!
//! This crate defines the static description a parser consumes:
//!
//! - [`CommandSpec`]: a command with its arguments, declared option groups,
//!   embedded ancestor groups, and nested subcommands.
//! - [`ArgumentSpec`]: a positional argument, option, or flag with arity,
//!   value type, capture strategy, and default.
//! - [`OptionGroup`]: a named bundle of arguments shared with descendants.
//! - [`SpecDocument`]: a versioned wrapper for authoring a tree as JSON or
//!   YAML.
//!
//! Validation ([`validate_command`], [`validate_document`]) enforces the
//! guarantees the parser relies on: unique option names after embedding
//! groups, a single trailing catch-all positional, resolvable group
//! references, and an acyclic subcommand tree.
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//!
//! let spec = CommandSpec::new("mycli")
//!     .with_group(
//!         OptionGroup::new("global")
//!             .with_argument(ArgumentSpec::flag("verbose", &["-v", "--verbose"])),
//!     )
//!     .with_subcommand(
//!         CommandSpec::new("run")
//!             .embed_group("global")
//!             .with_argument(ArgumentSpec::option("port", &["--port"]).integer().optional())
//!             .with_argument(ArgumentSpec::positional("script")),
//!     );
//!
//! assert_eq!(spec.find_subcommand("run").unwrap().name, "run");
//! assert!(validate_command(&spec).is_empty());
//! ```

mod document;
mod types;
mod validate;

pub use document::SpecDocument;
pub use types::*;
pub use validate::{ValidationError, validate_command, validate_document};
