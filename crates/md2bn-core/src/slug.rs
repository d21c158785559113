//! Heading slugs for deep links

/// Generate a slug from heading text
///
/// Lowercases, drops everything outside `[a-z0-9 ]`, and replaces each run
/// of spaces with a single `-`.
///
/// ```
/// use md2bn_core::slugify;
///
/// assert_eq!(slugify("What is Go!"), "what-is-go");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.to_lowercase().chars() {
        if c == ' ' {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_space = false;
        }
    }

    slug
}
