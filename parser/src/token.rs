//! Token stream construction.
//!
//! Splits raw invocation arguments into classified [`Token`]s. Classification
//! is purely lexical: option names are resolved later by the consumption
//! engine against a specific command layer.

use serde::Serialize;

/// The literal that ends option-like interpretation.
pub const TERMINATOR: &str = "--";

/// Lexical class of a raw argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Starts with `-` and is not a lone `-`.
    OptionLike,
    /// Anything else, and every token after the terminator.
    PositionalLike,
    /// The first literal `--`.
    Terminator,
}

/// A single raw argument with its classification and original index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub raw: String,
    pub kind: TokenKind,
    /// Index in the original argument list.
    pub position: usize,
    /// Whether the token appears after the terminator.
    pub terminated: bool,
}

impl Token {
    pub fn is_option_like(&self) -> bool {
        self.kind == TokenKind::OptionLike
    }

    /// Returns the option spelling, without any `=value` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_parser::TokenStream;
    ///
    /// let stream = TokenStream::new(["--feature=1", "-v"]);
    /// assert_eq!(stream.tokens()[0].option_name(), "--feature");
    /// assert_eq!(stream.tokens()[0].attached_value(), Some("1"));
    /// assert_eq!(stream.tokens()[1].attached_value(), None);
    /// ```
    pub fn option_name(&self) -> &str {
        match self.raw.split_once('=') {
            Some((name, _)) if self.is_option_like() => name,
            _ => &self.raw,
        }
    }

    /// Returns the value attached with `=`, if any.
    pub fn attached_value(&self) -> Option<&str> {
        if !self.is_option_like() {
            return None;
        }
        self.raw.split_once('=').map(|(_, value)| value)
    }

    /// Returns `true` for option-like tokens that are signed integer literals (`-5`).
    pub fn is_negative_number(&self) -> bool {
        self.is_option_like() && self.raw.parse::<i64>().is_ok()
    }

    /// Builds a value token from the `=value` part of this option token.
    pub(crate) fn attached(&self, value: &str) -> Token {
        Token {
            raw: value.to_string(),
            kind: TokenKind::PositionalLike,
            position: self.position,
            terminated: self.terminated,
        }
    }
}

/// An immutable, order-preserving view of classified invocation arguments.
///
/// # Examples
///
/// ```
/// use command_args_parser::{TokenKind, TokenStream};
///
/// let stream = TokenStream::new(["run", "-v", "--", "--not-an-option", "-"]);
/// let kinds: Vec<_> = stream.tokens().iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::PositionalLike,
///         TokenKind::OptionLike,
///         TokenKind::Terminator,
///         TokenKind::PositionalLike,
///         TokenKind::PositionalLike,
///     ]
/// );
/// assert_eq!(stream.terminator(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terminator: Option<usize>,
}

impl TokenStream {
    /// Classifies `args` (the invocation arguments without the program name).
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terminator = None;
        let tokens = args
            .into_iter()
            .enumerate()
            .map(|(position, raw)| {
                let raw = raw.into();
                let terminated = terminator.is_some();
                let kind = if terminated {
                    TokenKind::PositionalLike
                } else if raw == TERMINATOR {
                    terminator = Some(position);
                    TokenKind::Terminator
                } else if raw.starts_with('-') && raw != "-" {
                    TokenKind::OptionLike
                } else {
                    TokenKind::PositionalLike
                };
                Token {
                    raw,
                    kind,
                    position,
                    terminated,
                }
            })
            .collect();

        Self { tokens, terminator }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Position of the terminator, if one was given.
    pub fn terminator(&self) -> Option<usize> {
        self.terminator
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}
