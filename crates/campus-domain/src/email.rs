//! Email normalization and institutional-domain rule.

/// Trim and lowercase an email address for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `true` when `email` (already normalized) belongs to `domain`.
///
/// `domain` is given without the `@` (e.g. `lnmiit.ac.in`). A bare `@domain`
/// with no local part is rejected.
pub fn is_institutional(email: &str, domain: &str) -> bool {
    let suffix = format!("@{}", domain.trim_start_matches('@').to_lowercase());
    email.len() > suffix.len() && email.ends_with(&suffix)
}

/// Local part of an email address (`alice@x.y` -> `alice`).
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn looks_like_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
