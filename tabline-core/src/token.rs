//! Whitespace tokenization and the ASCII case folding used by matching.

/// Split a line into whitespace-delimited tokens. No quoting, no escapes.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Whether the line is empty or whitespace only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// ASCII-only lowercase; byte offsets stay valid for the original string.
pub fn fold(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// Byte length of the longest common prefix of `a` and `b`, on char boundaries.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}
