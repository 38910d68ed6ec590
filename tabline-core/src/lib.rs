//! # Tabline Core
//!
//! Command resolution and incremental autocomplete for line-oriented
//! consoles. Commands are sequences of token generators; a typed line is
//! resolved to the first command whose fixed tokens match exactly, and a
//! partial line is extended token by token toward its longest unambiguous
//! completion.

pub mod command;
pub mod complete;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod token;

// Re-export commonly used types at the crate root.
pub use command::{
    AliasGroup, CommandCallback, CommandContext, CommandDefinition, CommandId, TokenGenerator,
    generator, literal,
};
pub use complete::{Completion, CompletionOptions, MatchRecord, SuggestionListing};
pub use config::{ConsoleConfig, load_config};
pub use console::{BANNER, Console, NOT_FOUND};
pub use error::{ArgumentError, ConfigError};
pub use history::HistoryBuffer;
pub use output::{OutputLog, TextSink};
pub use registry::CommandRegistry;
pub use resolver::{resolve, resolve_legacy};
pub use token::tokenize;
