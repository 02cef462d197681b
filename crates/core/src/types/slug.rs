//! URL slugs.

/// Turn free text into a URL slug.
///
/// Lowercases ASCII letters, keeps ASCII digits, and collapses every run of
/// other characters into a single `-`. Leading and trailing separators are
/// dropped, so the result may be empty.
///
/// ```
/// use smoothgen_core::slugify;
///
/// assert_eq!(slugify("Deep  Blue Sea"), "deep-blue-sea");
/// assert_eq!(slugify("  --XL!  "), "xl");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
