/// Derive a URL-safe slug from a product name: lowercase, runs of
/// non-alphanumeric characters collapse into a single hyphen, no
/// leading or trailing hyphen. Mirrors what the storefront form
/// pre-fills, so server-derived and client-derived slugs agree.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// A slug is non-empty, lowercase alphanumeric with single hyphens
/// between runs, and never starts or ends with a hyphen.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }
    let mut prev_hyphen = false;
    for ch in slug.chars() {
        match ch {
            'a'..='z' | '0'..='9' => prev_hyphen = false,
            '-' => {
                if prev_hyphen {
                    return false;
                }
                prev_hyphen = true;
            }
            _ => return false,
        }
    }
    true
}
