fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strips trailing `/` and `\` from a directory path. A path made only of
/// separators collapses to a single one so the filesystem root stays
/// addressable.
pub fn normalize_dir(path: &str) -> String {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() && !path.is_empty() {
        return path[..1].to_string();
    }
    trimmed.to_string()
}

/// Splits a directory path on both separator styles. Empty segments are kept
/// so counting from the end matches the raw layout (`/a/b` → `["", "a", "b"]`).
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(is_separator).collect()
}
