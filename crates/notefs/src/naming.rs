use std::collections::HashSet;

/// Directory name used when a node has no usable title.
pub const DEFAULT_NODE_NAME: &str = "new page";

/// Derives a backing-store-legal directory name from a node title.
///
/// Lowercases, replaces separator and reserved characters, and trims
/// edge whitespace and dots. Falls back to [`DEFAULT_NODE_NAME`] when
/// nothing survives. Called once at creation; a later title edit does
/// not rename the directory.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();
    if cleaned.is_empty() {
        DEFAULT_NODE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Picks a sibling-unique directory name for `base`.
///
/// Appends `-2`, `-3`, ... until no existing sibling claims the name.
pub fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 2u64;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
