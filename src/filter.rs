//! Benchmark selection: name patterns and group tags.

/// Returns true when `name` matches `pattern`.
///
/// Patterns without wildcards match by case-sensitive substring. Patterns
/// containing `*` (any run of characters, possibly empty) or `?` (exactly
/// one character) are glob-matched against the whole name. An absent or
/// empty pattern matches everything.
pub(crate) fn matches(name: &str, pattern: Option<&str>) -> bool {
    let pattern = match pattern {
        None => return true,
        Some(p) if p.is_empty() => return true,
        Some(p) => p,
    };

    if pattern.contains(|c| c == '*' || c == '?') {
        glob_match(pattern, name)
    } else {
        name.contains(pattern)
    }
}

/// Returns true when the group should run under the requested tags: either
/// no tags were requested, or the group shares at least one of them.
pub(crate) fn matches_tags(group_tags: &[String], required: &[String]) -> bool {
    required.is_empty() || required.iter().any(|r| group_tags.iter().any(|t| t == r))
}

/// Iterative glob matcher with single-star backtracking.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();
    let mut p = 0;
    let mut t = 0;
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            // Backtrack: let the star consume one more character.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
