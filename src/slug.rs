/// Derive a URL-safe slug from a human-readable name.
///
/// Lowercases and trims the name, turns every whitespace run into a single
/// hyphen and drops anything that is not an ASCII letter, digit or hyphen.
/// Two names can map to the same slug.
///
/// - "Book Club" -> "book-club"
/// - "  Sci-Fi!! Fans  " -> "sci-fi-fans"
#[must_use]
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(normalize("Book Club"), "book-club");
    }

    #[test]
    fn test_punctuation_and_padding() {
        assert_eq!(normalize("  Sci-Fi!! Fans  "), "sci-fi-fans");
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(normalize("rust \t  and\nfriends"), "rust-and-friends");
    }

    #[test]
    fn test_existing_hyphens_are_kept() {
        assert_eq!(normalize("a - b"), "a---b");
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(normalize("Café Ünion 42"), "caf-nion-42");
    }

    #[test]
    fn test_nothing_left() {
        assert_eq!(normalize("!!! ???"), "-");
        assert_eq!(normalize("   "), "");
    }
}
