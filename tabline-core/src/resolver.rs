//! Resolution of a fully typed line to a command.
//!
//! Two paths exist side by side. The generator-based resolver matches fixed
//! tokens exactly against fresh generator output; the legacy resolver picks
//! the longest literal command string the line starts with.

use tracing::{trace, warn};

use crate::command::CommandId;
use crate::registry::CommandRegistry;

/// Find the first registered command whose fixed tokens all match exactly.
///
/// Matching is case-sensitive and whole-token. Generators are invoked fresh
/// for every candidate; later commands are never evaluated once one matches.
pub fn resolve(registry: &CommandRegistry, tokens: &[String]) -> Option<CommandId> {
    if tokens.is_empty() {
        return None;
    }

    for (id, command) in registry.iter() {
        if command.fixed_tokens() > tokens.len() {
            continue;
        }
        if !command.is_well_formed() {
            warn!(
                command = %id,
                fixed_tokens = command.fixed_tokens(),
                generators = command.generators().len(),
                "Skipping command with more fixed tokens than generators"
            );
            continue;
        }

        let matched = command
            .fixed_generators()
            .iter()
            .zip(tokens)
            .all(|(generate, token)| generate().iter().any(|group| group.contains(token)));
        if matched {
            trace!(command = %id, "Resolved command");
            return Some(id);
        }
    }

    None
}

/// Index of the longest legacy literal that prefixes `line` on a token boundary.
///
/// The literal must equal the whole line or be followed by a space. Among
/// equally long matches the earliest registration wins.
pub fn resolve_legacy(registry: &CommandRegistry, line: &str) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;

    for (index, command) in registry.legacy().iter().enumerate() {
        let literal = command.literal.as_str();
        if !line.starts_with(literal) {
            continue;
        }
        let on_boundary = line.len() == literal.len() || line.as_bytes()[literal.len()] == b' ';
        if !on_boundary {
            continue;
        }
        if best.is_none_or(|(_, len)| literal.len() > len) {
            best = Some((index, literal.len()));
        }
    }

    best.map(|(index, _)| index)
}
