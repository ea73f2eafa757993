//! URL slugs derived from post titles.

/// Lowercase the title and collapse whitespace and punctuation into single hyphens.
pub fn slugify_title(title: &str) -> String {
    slug::slugify(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World Example"), "hello-world-example");
        assert_eq!(slugify_title("  Rust, Again!  "), "rust-again");
        assert_eq!(slugify_title("Async & Await"), "async-await");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify_title("Same Title Twice"), slugify_title("Same Title Twice"));
    }
}
