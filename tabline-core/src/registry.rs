//! Command registry.
//!
//! Holds every command in registration order. The registration index is the
//! command's identity and the tie-break when several commands could match.
//! A second, flat table of literal command strings backs the legacy
//! longest-prefix resolver.

use tracing::debug;

use crate::command::{CommandCallback, CommandDefinition, CommandId, TokenGenerator};

/// A literal command string and its callback, matched by longest prefix.
#[derive(Clone)]
pub struct LegacyCommand {
    pub literal: String,
    pub callback: CommandCallback,
}

impl std::fmt::Debug for LegacyCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyCommand")
            .field("literal", &self.literal)
            .finish_non_exhaustive()
    }
}

/// Registry holding all commands in registration order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
    legacy: Vec<LegacyCommand>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Arity against `fixed_tokens` is checked lazily.
    pub fn register(
        &mut self,
        generators: Vec<TokenGenerator>,
        fixed_tokens: usize,
        callback: CommandCallback,
    ) -> CommandId {
        let id = CommandId(self.commands.len());
        debug!(
            command = %id,
            generators = generators.len(),
            fixed_tokens,
            "Registering command"
        );
        self.commands
            .push(CommandDefinition::new(generators, fixed_tokens, callback));
        id
    }

    /// Register a literal command string for the legacy prefix resolver.
    pub fn register_legacy(&mut self, literal: impl Into<String>, callback: CommandCallback) {
        let literal = literal.into();
        debug!(literal = %literal, "Registering legacy command");
        self.legacy.push(LegacyCommand { literal, callback });
    }

    pub fn get(&self, id: CommandId) -> Option<&CommandDefinition> {
        self.commands.get(id.0)
    }

    pub fn legacy(&self) -> &[LegacyCommand] {
        &self.legacy
    }

    /// Iterate commands with their ids, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &CommandDefinition)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, command)| (CommandId(index), command))
    }

    /// Return the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn legacy_len(&self) -> usize {
        self.legacy.len()
    }

    /// One line per command showing its fixed tokens.
    ///
    /// Groups sharing a position are joined with `/`; only each group's
    /// canonical alias is shown. Positions whose generator yields nothing
    /// are left out.
    pub fn list(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|command| {
                command
                    .fixed_generators()
                    .iter()
                    .map(|generate| {
                        generate()
                            .iter()
                            .filter_map(|group| group.canonical())
                            .collect::<Vec<_>>()
                            .join("/")
                    })
                    .filter(|rendered| !rendered.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
