//! Character-safe truncation of free text.

/// First `max_chars` characters, marked with `...` when cut.
pub fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

/// First `max_chars` characters, unmarked.
pub fn prefix(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
