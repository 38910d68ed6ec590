//! Command definitions and the types they are built from.
//!
//! A command is an ordered list of token generators. Each generator yields,
//! at call time, the alias groups accepted at its token position. Generators
//! are re-invoked on every resolution and completion pass because their
//! output may depend on live state (for example "the currently loaded items").

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ArgumentError;
use crate::registry::CommandRegistry;

/// Interchangeable spellings naming one candidate at a token position.
///
/// The first alias is the canonical display form. Matching folds ASCII case;
/// insertion and display keep the alias as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasGroup(Vec<String>);

impl AliasGroup {
    pub fn new(aliases: Vec<String>) -> Self {
        Self(aliases)
    }

    /// The display form of this group, if it has any alias at all.
    pub fn canonical(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn aliases(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, case-sensitive membership test used by the resolver.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|alias| alias == token)
    }
}

impl From<&[&str]> for AliasGroup {
    fn from(aliases: &[&str]) -> Self {
        Self(aliases.iter().map(|a| a.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AliasGroup {
    fn from(aliases: [&str; N]) -> Self {
        Self(aliases.iter().map(|a| a.to_string()).collect())
    }
}

impl From<Vec<String>> for AliasGroup {
    fn from(aliases: Vec<String>) -> Self {
        Self(aliases)
    }
}

impl<S: Into<String>> FromIterator<S> for AliasGroup {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Produces the alias groups valid at one token position of one command.
pub type TokenGenerator = Arc<dyn Fn() -> Vec<AliasGroup> + Send + Sync>;

/// Wrap a closure as a [`TokenGenerator`].
pub fn generator<F>(f: F) -> TokenGenerator
where
    F: Fn() -> Vec<AliasGroup> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A generator that always yields a single group with the given aliases.
pub fn literal(aliases: &[&str]) -> TokenGenerator {
    let group = AliasGroup::from(aliases);
    Arc::new(move || vec![group.clone()])
}

/// Invoked with the submitted tokens once a command has been resolved.
pub type CommandCallback =
    Arc<dyn Fn(&CommandContext<'_>) -> Result<String, ArgumentError> + Send + Sync>;

/// Opaque command identifier: the registration index in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a callback sees when it runs.
pub struct CommandContext<'a> {
    tokens: &'a [String],
    registry: &'a CommandRegistry,
}

impl<'a> CommandContext<'a> {
    pub fn new(tokens: &'a [String], registry: &'a CommandRegistry) -> Self {
        Self { tokens, registry }
    }

    /// The full token sequence, including the fixed tokens.
    pub fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// Token at `index`, or [`ArgumentError::OutOfRange`] when the line is too short.
    pub fn arg(&self, index: usize) -> Result<&'a str, ArgumentError> {
        self.tokens
            .get(index)
            .map(String::as_str)
            .ok_or(ArgumentError::OutOfRange)
    }

    /// Token at `index` parsed as `T`, or [`ArgumentError::Invalid`] when it does not parse.
    pub fn parse_arg<T: FromStr>(&self, index: usize) -> Result<T, ArgumentError> {
        self.arg(index)?
            .parse()
            .map_err(|_| ArgumentError::Invalid)
    }
}

/// One registered command.
#[derive(Clone)]
pub struct CommandDefinition {
    generators: Vec<TokenGenerator>,
    fixed_tokens: usize,
    callback: CommandCallback,
}

impl CommandDefinition {
    pub fn new(
        generators: Vec<TokenGenerator>,
        fixed_tokens: usize,
        callback: CommandCallback,
    ) -> Self {
        Self {
            generators,
            fixed_tokens,
            callback,
        }
    }

    pub fn generators(&self) -> &[TokenGenerator] {
        &self.generators
    }

    /// Number of leading tokens that identify this command.
    pub fn fixed_tokens(&self) -> usize {
        self.fixed_tokens
    }

    /// Generators inside the fixed count, clamped to what was registered.
    pub fn fixed_generators(&self) -> &[TokenGenerator] {
        &self.generators[..self.fixed_tokens.min(self.generators.len())]
    }

    /// Whether the fixed count fits the registered generators.
    pub fn is_well_formed(&self) -> bool {
        self.fixed_tokens <= self.generators.len()
    }

    /// Number of token positions completion considers for this command.
    pub fn relevant_len(&self, limit_to_fixed: bool) -> usize {
        if limit_to_fixed {
            self.fixed_generators().len()
        } else {
            self.generators.len()
        }
    }

    /// Fresh generator output for `position`; empty beyond the registered generators.
    pub fn groups_at(&self, position: usize) -> Vec<AliasGroup> {
        self.generators
            .get(position)
            .map(|generate| generate())
            .unwrap_or_default()
    }

    pub fn invoke(&self, ctx: &CommandContext<'_>) -> Result<String, ArgumentError> {
        (self.callback)(ctx)
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("generators", &self.generators.len())
            .field("fixed_tokens", &self.fixed_tokens)
            .finish_non_exhaustive()
    }
}
