//! Password strength rules.
//!
//! Every failed rule contributes one message; an empty result means the
//! password is acceptable.

pub const MIN_PASSWORD_LEN: usize = 8;

/// Passwords rejected outright regardless of length.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "admin123", "welcome1", "letmein1",
    "abc12345", "football", "baseball", "sunshine", "princess", "11111111",
    "00000000", "passw0rd", "trustno1", "superman", "1q2w3e4r", "asdfghjk",
];

/// Fraction of the password that may be shared with a user attribute.
const MAX_SIMILARITY: f64 = 0.7;

/// Validate `password` against the strength rules.
///
/// `user_attributes` are values the password must not resemble
/// (email local part, username).
pub fn validate_password(password: &str, user_attributes: &[&str]) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
        ));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        errors.push("This password is too common.".to_owned());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_owned());
    }

    let similar = user_attributes
        .iter()
        .map(|attr| attr.trim().to_lowercase())
        .filter(|attr| !attr.is_empty())
        .any(|attr| too_similar(&lowered, &attr));
    if similar {
        errors.push("The password is too similar to your personal information.".to_owned());
    }

    errors
}

fn too_similar(password: &str, attribute: &str) -> bool {
    if password == attribute {
        return true;
    }
    let longest = longest_common_substring(password, attribute);
    let base = password.chars().count().max(1);
    (longest as f64 / base as f64) >= MAX_SIMILARITY
}

fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut best = 0;
    let mut prev = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        let mut row = vec![0usize; b.len() + 1];
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                row[j] = prev[j - 1] + 1;
                best = best.max(row[j]);
            }
        }
        prev = row;
    }
    best
}
