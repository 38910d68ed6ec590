//! Incremental autocomplete over multi-token commands.
//!
//! Each typed token is extended to the longest prefix shared by the
//! candidates still in play. Commands that stop matching at one token drop
//! out for the tokens after it. Matching folds ASCII case and runs in two
//! tiers: candidates that start with the typed token beat candidates that
//! merely contain it.
//!
//! Generator output is never cached: every call re-invokes the generators
//! of every live command at every position it reaches.

use std::cmp::Ordering;

use tracing::trace;

use crate::command::{AliasGroup, CommandId};
use crate::registry::CommandRegistry;
use crate::token::{common_prefix_len, fold, tokenize};

/// Mode flags for a completion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Only consider each command's fixed tokens.
    pub limit_to_fixed: bool,
    /// Collect a ranked suggestion listing per token.
    pub emit_suggestions: bool,
    /// Produce the rewritten line.
    pub rewrite_input: bool,
}

impl CompletionOptions {
    /// The mode a Tab key press uses: all tokens, suggestions, rewrite.
    pub fn interactive() -> Self {
        Self {
            limit_to_fixed: false,
            emit_suggestions: true,
            rewrite_input: true,
        }
    }

    /// Rewrite only, without suggestions.
    pub fn rewrite_only() -> Self {
        Self {
            limit_to_fixed: false,
            emit_suggestions: false,
            rewrite_input: true,
        }
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Best match of the typed token within one alias group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Byte offset of the typed token inside the folded alias, if found.
    pub position: Option<usize>,
    /// Alias length minus typed token length.
    pub length_gap: isize,
    pub command: CommandId,
    /// Index of the group in its generator's output.
    pub group: usize,
    /// The best alias as written.
    pub candidate: String,
    /// The best alias, folded.
    pub lowered: String,
    /// Every alias of the group, for suggestion listings.
    pub aliases: Vec<String>,
}

impl MatchRecord {
    fn new(
        token: &str,
        command: CommandId,
        group: usize,
        alias: &str,
        aliases: &[String],
    ) -> Self {
        let lowered = fold(alias);
        Self {
            position: lowered.find(token),
            length_gap: lowered.len() as isize - token.len() as isize,
            command,
            group,
            candidate: alias.to_string(),
            lowered,
            aliases: aliases.to_vec(),
        }
    }

    /// Earliest occurrence first, then the alias closest in length. Misses sort last.
    pub fn rank(&self) -> (usize, isize) {
        (self.position.unwrap_or(usize::MAX), self.length_gap)
    }

    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// Select the best alias of a group for the folded `token`.
    fn best_in_group(
        token: &str,
        command: CommandId,
        group_index: usize,
        group: &AliasGroup,
    ) -> Option<Self> {
        group
            .aliases()
            .iter()
            .map(|alias| Self::new(token, command, group_index, alias, group.aliases()))
            .min_by(Self::cmp_rank)
    }
}

/// Ranked candidates for one token position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionListing {
    pub token_index: usize,
    /// Groups whose best alias starts with the typed token.
    pub prefix: Vec<MatchRecord>,
    /// Groups whose best alias contains the typed token elsewhere.
    pub substring: Vec<MatchRecord>,
}

impl SuggestionListing {
    /// Header line, then one line per group with every alias padded to `column_width`.
    pub fn render(&self, column_width: usize) -> Vec<String> {
        let mut lines = vec!["suggestions:".to_string()];
        for record in self.prefix.iter().chain(&self.substring) {
            let line: String = record
                .aliases
                .iter()
                .map(|alias| format!("{alias:<column_width$}"))
                .collect();
            lines.push(line);
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.substring.is_empty()
    }
}

/// Result of a completion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// The rewritten line, when rewriting was requested and there was input.
    pub line: Option<String>,
    /// One listing per typed token, when suggestions were requested.
    pub suggestions: Vec<SuggestionListing>,
}

/// A token after completion and whether it can still be narrowed.
#[derive(Debug, Clone)]
struct EditedToken {
    text: String,
    exhausted: bool,
}

/// Extend each token of `input` toward its longest unambiguous completion.
pub fn complete(
    registry: &CommandRegistry,
    input: &str,
    options: CompletionOptions,
) -> Completion {
    let typed = tokenize(input);
    if typed.is_empty() {
        return Completion::default();
    }

    let mut edited: Vec<EditedToken> = typed
        .iter()
        .map(|text| EditedToken {
            text: text.clone(),
            exhausted: false,
        })
        .collect();
    let mut alive = vec![true; registry.len()];
    let mut suggestions = Vec::new();

    for (position, raw) in typed.iter().enumerate() {
        let token = fold(raw);
        let mut prefix = Vec::new();
        let mut substring = Vec::new();

        for (id, command) in registry.iter() {
            if !alive[id.index()] || position >= command.relevant_len(options.limit_to_fixed) {
                continue;
            }
            alive[id.index()] = false;

            for (group_index, group) in command.groups_at(position).iter().enumerate() {
                let Some(best) = MatchRecord::best_in_group(&token, id, group_index, group) else {
                    continue;
                };
                match best.position {
                    Some(0) => prefix.push(best),
                    Some(_) => substring.push(best),
                    None => {}
                }
            }
        }

        let bucket = if !prefix.is_empty() {
            Some(&prefix)
        } else if !substring.is_empty() {
            Some(&substring)
        } else {
            None
        };

        if let Some(bucket) = bucket {
            for record in bucket.iter() {
                alive[record.command.index()] = true;
            }
            if let Some(narrowed) = narrow(bucket, raw.len()) {
                edited[position] = narrowed;
            }
            trace!(
                position,
                candidates = bucket.len(),
                text = %edited[position].text,
                exhausted = edited[position].exhausted,
                "Completed token"
            );
        }

        if options.emit_suggestions {
            prefix.sort_by(MatchRecord::cmp_rank);
            substring.sort_by(MatchRecord::cmp_rank);
            suggestions.push(SuggestionListing {
                token_index: position,
                prefix,
                substring,
            });
        }
    }

    let line = options
        .rewrite_input
        .then(|| reassemble(&edited, input.ends_with(char::is_whitespace)));

    Completion { line, suggestions }
}

/// Longest shared prefix of a bucket, spelled like its first record.
///
/// Returns `None` when there is no shared prefix or when it would be shorter
/// than what was typed.
fn narrow(bucket: &[MatchRecord], typed_len: usize) -> Option<EditedToken> {
    let first = bucket.first()?;
    let common = bucket
        .iter()
        .map(|record| common_prefix_len(&first.lowered, &record.lowered))
        .min()
        .unwrap_or(0);
    let longest = bucket
        .iter()
        .map(|record| record.lowered.len())
        .max()
        .unwrap_or(0);

    if common == 0 || common < typed_len {
        return None;
    }
    Some(EditedToken {
        text: first.candidate[..common].to_string(),
        exhausted: longest == common,
    })
}

fn reassemble(tokens: &[EditedToken], trailing_whitespace: bool) -> String {
    let mut line = String::new();
    let last = tokens.len().saturating_sub(1);
    for (index, token) in tokens.iter().enumerate() {
        line.push_str(&token.text);
        if index != last || trailing_whitespace || token.exhausted {
            line.push(' ');
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandCallback, CommandContext, generator, literal};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Arc, Mutex};

    fn noop() -> CommandCallback {
        Arc::new(|_ctx: &CommandContext<'_>| Ok(String::new()))
    }

    fn rewrite(registry: &CommandRegistry, input: &str) -> String {
        complete(registry, input, CompletionOptions::rewrite_only())
            .line
            .unwrap_or_default()
    }

    fn sample_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["list"])], 1, noop());
        registry.register(
            vec![
                literal(&["load", "ld"]),
                generator(|| vec![AliasGroup::from(["game"]), AliasGroup::from(["level"])]),
            ],
            1,
            noop(),
        );
        registry.register(vec![literal(&["save"]), literal(&["slot"])], 1, noop());
        registry.register(vec![literal(&["saveall"])], 1, noop());
        registry
    }

    #[test]
    fn test_empty_input_is_noop() {
        let registry = sample_registry();
        let options = CompletionOptions::interactive();
        assert_eq!(complete(&registry, "", options), Completion::default());
        assert_eq!(complete(&registry, "   ", options), Completion::default());
    }

    #[test]
    fn test_unique_prefix_completes_with_space() {
        let registry = sample_registry();
        assert_eq!(rewrite(&registry, "lo"), "load ");
    }

    #[test]
    fn test_shared_prefix_stays_open() {
        let registry = sample_registry();
        assert_eq!(rewrite(&registry, "sa"), "save");
        assert_eq!(rewrite(&registry, "save"), "save");
    }

    #[test]
    fn test_ambiguous_short_prefix() {
        let registry = sample_registry();
        // list, load: common prefix is just "l"
        assert_eq!(rewrite(&registry, "l"), "l");
    }

    #[test]
    fn test_exhausted_token_is_idempotent() {
        let registry = sample_registry();
        let once = rewrite(&registry, "lo");
        let twice = rewrite(&registry, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_case_insensitive_keeps_candidate_case() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["SpawnItem"])], 1, noop());
        assert_eq!(rewrite(&registry, "spa"), "SpawnItem ");
        assert_eq!(rewrite(&registry, "SPAWNITEM"), "SpawnItem ");
    }

    #[test]
    fn test_second_token_narrows_by_live_commands() {
        let registry = sample_registry();
        assert_eq!(rewrite(&registry, "ld le"), "ld level ");
        assert_eq!(rewrite(&registry, "load g"), "load game ");
    }

    #[test]
    fn test_trailing_whitespace_preserved() {
        let registry = sample_registry();
        assert_eq!(rewrite(&registry, "sa "), "save ");
        assert_eq!(rewrite(&registry, "load  g"), "load game ");
    }

    #[test]
    fn test_unmatched_token_left_unchanged() {
        let registry = sample_registry();
        assert_eq!(rewrite(&registry, "xyz"), "xyz");
        assert_eq!(rewrite(&registry, "xyz lo"), "xyz lo");
    }

    #[test]
    fn test_substring_match_when_no_prefix_match() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["teleport"])], 1, noop());
        assert_eq!(rewrite(&registry, "port"), "teleport ");
    }

    #[test]
    fn test_prefix_bucket_dominates_substring() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["deport"])], 1, noop());
        registry.register(vec![literal(&["port"])], 1, noop());
        registry.register(vec![literal(&["portal"])], 1, noop());
        // "deport" contains "port" but both prefix matches decide
        assert_eq!(rewrite(&registry, "por"), "port");
    }

    #[test]
    fn test_substring_never_truncates_typed_token() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["save"])], 1, noop());
        registry.register(vec![literal(&["slave"])], 1, noop());
        assert_eq!(rewrite(&registry, "ave"), "ave");
    }

    #[test]
    fn test_best_alias_per_group() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["kill", "slay"])], 1, noop());
        registry.register(vec![literal(&["skip"])], 1, noop());
        // group one matches through "slay", group two through "skip"
        assert_eq!(rewrite(&registry, "s"), "s");
        assert_eq!(rewrite(&registry, "sl"), "slay ");
    }

    #[test]
    fn test_alias_closest_in_length_wins() {
        let record = MatchRecord::best_in_group(
            "go",
            CommandId(0),
            0,
            &AliasGroup::from(["gotopos", "goto"]),
        )
        .unwrap();
        assert_eq!(record.candidate, "goto");
        assert_eq!(record.rank(), (0, 2));
    }

    #[test]
    fn test_earliest_position_beats_length() {
        let record = MatchRecord::best_in_group(
            "it",
            CommandId(0),
            0,
            &AliasGroup::from(["spit", "itemlist"]),
        )
        .unwrap();
        assert_eq!(record.candidate, "itemlist");
    }

    #[test]
    fn test_empty_group_contributes_nothing() {
        assert!(
            MatchRecord::best_in_group("a", CommandId(0), 0, &AliasGroup::default()).is_none()
        );
    }

    #[test]
    fn test_dead_command_not_reevaluated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = CommandRegistry::new();
        registry.register(
            vec![
                literal(&["give"]),
                generator(move || {
                    counter.fetch_add(1, AtomicOrdering::SeqCst);
                    vec![AliasGroup::from(["sword"])]
                }),
            ],
            2,
            noop(),
        );
        rewrite(&registry, "take sw");
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 0);
        rewrite(&registry, "give sw");
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_generators_reinvoked_every_call() {
        let items = Arc::new(Mutex::new(vec!["apple".to_string()]));
        let source = Arc::clone(&items);
        let mut registry = CommandRegistry::new();
        registry.register(
            vec![
                literal(&["eat"]),
                generator(move || {
                    source
                        .lock()
                        .map(|i| i.iter().map(|name| AliasGroup::from([name.as_str()])).collect())
                        .unwrap_or_default()
                }),
            ],
            1,
            noop(),
        );
        assert_eq!(rewrite(&registry, "eat a"), "eat apple ");
        items.lock().unwrap().push("apricot".to_string());
        assert_eq!(rewrite(&registry, "eat a"), "eat ap");
    }

    #[test]
    fn test_limit_to_fixed_ignores_argument_tokens() {
        let registry = sample_registry();
        let options = CompletionOptions {
            limit_to_fixed: true,
            emit_suggestions: false,
            rewrite_input: true,
        };
        // position 1 of "load" is an argument generator, not a fixed token
        let line = complete(&registry, "load g", options).line.unwrap();
        assert_eq!(line, "load g");
    }

    #[test]
    fn test_no_rewrite_returns_no_line() {
        let registry = sample_registry();
        let options = CompletionOptions {
            limit_to_fixed: false,
            emit_suggestions: false,
            rewrite_input: false,
        };
        assert_eq!(complete(&registry, "lo", options).line, None);
    }

    #[test]
    fn test_suggestions_ranked_and_bucketed() {
        let mut registry = CommandRegistry::new();
        registry.register(vec![literal(&["teleport", "tp"])], 1, noop());
        registry.register(vec![literal(&["test"])], 1, noop());
        registry.register(vec![literal(&["stem"])], 1, noop());
        let completion = complete(&registry, "te", CompletionOptions::interactive());

        assert_eq!(completion.suggestions.len(), 1);
        let listing = &completion.suggestions[0];
        let prefix: Vec<&str> = listing.prefix.iter().map(|r| r.candidate.as_str()).collect();
        let substring: Vec<&str> = listing
            .substring
            .iter()
            .map(|r| r.candidate.as_str())
            .collect();
        assert_eq!(prefix, vec!["test", "teleport"]);
        assert_eq!(substring, vec!["stem"]);
        assert_eq!(completion.line.as_deref(), Some("te"));
    }

    #[test]
    fn test_suggestion_ties_keep_generator_order() {
        let mut registry = CommandRegistry::new();
        registry.register(
            vec![generator(|| {
                vec![AliasGroup::from(["mob"]), AliasGroup::from(["map"])]
            })],
            1,
            noop(),
        );
        let completion = complete(&registry, "m", CompletionOptions::interactive());
        let order: Vec<&str> = completion.suggestions[0]
            .prefix
            .iter()
            .map(|r| r.candidate.as_str())
            .collect();
        assert_eq!(order, vec!["mob", "map"]);
    }

    #[test]
    fn test_suggestions_do_not_change_result() {
        let registry = sample_registry();
        let with = complete(&registry, "sa", CompletionOptions::interactive());
        let without = complete(&registry, "sa", CompletionOptions::rewrite_only());
        assert_eq!(with.line, without.line);
        assert!(without.suggestions.is_empty());
    }

    #[test]
    fn test_render_pads_every_alias() {
        let listing = SuggestionListing {
            token_index: 0,
            prefix: vec![MatchRecord::new(
                "lo",
                CommandId(1),
                0,
                "load",
                &["load".to_string(), "ld".to_string()],
            )],
            substring: vec![],
        };
        let lines = listing.render(6);
        assert_eq!(lines, vec!["suggestions:".to_string(), "load  ld    ".to_string()]);
    }
}
