//! Slug derivation from prompt titles

/// Derive a URL-friendly slug from a title.
///
/// Lowercases the title, turns spaces into hyphens, then drops every
/// character that is not a lowercase ASCII letter, digit, or hyphen.
/// Punctuation and non-ASCII characters are removed, not transliterated,
/// so distinct titles can collapse to the same slug ("Test!" and "Test?"
/// both become "test"). Collisions are caught by the slug uniqueness
/// constraint at insert time.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
