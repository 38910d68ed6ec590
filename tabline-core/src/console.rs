//! The console: one owned instance tying registry, history and output together.
//!
//! Hosts drive it with whole lines (`submit`), partial lines (`complete`) and
//! history navigation. Everything runs synchronously on the caller's thread.

use std::sync::Arc;

use tracing::{debug, info};

use crate::command::{CommandCallback, CommandContext, CommandId, TokenGenerator, literal};
use crate::complete::{self, CompletionOptions};
use crate::config::ConsoleConfig;
use crate::error::ArgumentError;
use crate::history::HistoryBuffer;
use crate::output::{OutputLog, TextSink};
use crate::registry::CommandRegistry;
use crate::resolver::{resolve, resolve_legacy};
use crate::token::tokenize;

/// Returned by [`Console::submit`] when no command matched.
pub const NOT_FOUND: &str = "NOTFOUND";

/// First line written to a fresh console.
pub const BANNER: &str = " ----------- tabline console ----------- ";

const NOT_FOUND_LINE: &str = " -- Command not found -- ";

/// A line-oriented command interpreter.
pub struct Console<S: TextSink = OutputLog> {
    config: ConsoleConfig,
    registry: CommandRegistry,
    history: HistoryBuffer,
    sink: S,
}

impl Console<OutputLog> {
    /// Console writing to a bounded output log sized from `config`.
    pub fn new(config: ConsoleConfig) -> Self {
        let sink = OutputLog::new(config.output.capacity);
        Self::with_sink(config, sink)
    }
}

impl Default for Console<OutputLog> {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl<S: TextSink> Console<S> {
    /// Console writing to a caller-supplied sink.
    pub fn with_sink(config: ConsoleConfig, sink: S) -> Self {
        let history = HistoryBuffer::new(config.history.max_entries);
        let mut console = Self {
            config,
            registry: CommandRegistry::new(),
            history,
            sink,
        };
        console.sink.push_line(BANNER);
        console.register_builtins();
        console
    }

    fn register_builtins(&mut self) {
        // list: one line per command, fixed tokens only
        self.registry.register(
            vec![literal(&["list"])],
            1,
            Arc::new(|ctx: &CommandContext<'_>| Ok(ctx.registry().list().join("\n"))),
        );
    }

    /// Register a command; see [`CommandRegistry::register`].
    pub fn register(
        &mut self,
        generators: Vec<TokenGenerator>,
        fixed_tokens: usize,
        callback: CommandCallback,
    ) -> CommandId {
        self.registry.register(generators, fixed_tokens, callback)
    }

    /// Register a literal command string for the legacy prefix resolver.
    pub fn register_legacy(&mut self, literal: impl Into<String>, callback: CommandCallback) {
        self.registry.register_legacy(literal, callback);
    }

    /// Submit a finished line and return the command's result text.
    ///
    /// An empty line does nothing and returns an empty string. A line no
    /// command accepts, including one of only whitespace, returns [`NOT_FOUND`].
    pub fn submit(&mut self, line: &str) -> String {
        self.history.submit(line);
        if line.is_empty() {
            return String::new();
        }

        self.sink.push_line(&format!(" >> {line}"));
        let tokens = tokenize(line);
        let ctx = CommandContext::new(&tokens, &self.registry);

        let outcome = if let Some(id) = resolve(&self.registry, &tokens) {
            debug!(command = %id, "Dispatching command");
            self.registry.get(id).map(|command| command.invoke(&ctx))
        } else if let Some(index) = resolve_legacy(&self.registry, line) {
            let command = &self.registry.legacy()[index];
            debug!(literal = %command.literal, "Dispatching legacy command");
            Some((command.callback)(&ctx))
        } else {
            None
        };

        let Some(outcome) = outcome else {
            info!(line, "Command not found");
            self.sink.push_line(NOT_FOUND_LINE);
            return NOT_FOUND.to_string();
        };

        let result = Self::settle(outcome);
        for text in result.lines() {
            self.sink.push_line(text);
        }
        result
    }

    /// Convert a callback outcome into the text shown to the user.
    fn settle(outcome: Result<String, ArgumentError>) -> String {
        outcome.unwrap_or_else(|err| {
            debug!(error = %err, "Command rejected its arguments");
            err.user_message()
        })
    }

    /// Run completion on a partial line.
    ///
    /// Suggestion listings go to the sink. Returns the rewritten line when
    /// `options.rewrite_input` is set and the line has tokens.
    pub fn complete(&mut self, line: &str, options: CompletionOptions) -> Option<String> {
        let completion = complete::complete(&self.registry, line, options);
        let width = self.config.completion.suggestion_column_width;
        for listing in &completion.suggestions {
            self.sink.extend_lines(listing.render(width));
        }
        completion.line
    }

    /// Older history entry; `current` is kept as the draft when browsing starts.
    pub fn history_older(&mut self, current: &str) -> Option<String> {
        self.history.older(current).map(str::to_string)
    }

    /// Newer history entry, or the draft once browsing walks past the newest.
    pub fn history_newer(&mut self) -> Option<String> {
        self.history.newer()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}
