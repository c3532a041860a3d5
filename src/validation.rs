//! Signup-form validation and the password strength heuristic.

use crate::models::NewUser;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Display bands for password strength, derived from the criteria score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => PasswordStrength::Weak,
            2 => PasswordStrength::Fair,
            3 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }
}

/// Scores a password by counting independent criteria: minimum length,
/// a lowercase letter, an uppercase letter, a digit, and a symbol.
/// Returns 0..=5; each satisfied criterion adds one.
pub fn password_strength(password: &str) -> u8 {
    let mut score = 0u8;
    if password.chars().count() >= MIN_PASSWORD_CHARS {
        score += 1;
    }
    if password.chars().any(|c| c.is_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        score += 1;
    }
    score
}

pub fn password_has_min_chars(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

/// Validates a username, returning the trimmed form.
///
/// Usernames are restricted to word characters (letters, digits,
/// underscore) so that an `@username` mention in comment text tokenizes
/// back to exactly the username.
pub fn validate_username(raw: &str) -> Result<&str, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Username is required");
    }
    if trimmed.starts_with('@') {
        return Err("Enter the username without the leading @");
    }
    if trimmed.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Ok(trimmed)
    } else {
        Err("Username can only use letters, numbers, and underscores")
    }
}

/// Minimal structural email check; the backend does the real validation.
pub fn validate_email(raw: &str) -> Result<&str, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Email is required");
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return Err("Email must contain an @");
    };
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err("Enter a valid email address");
    }
    Ok(trimmed)
}

/// Aggregate check run before submitting the signup form.
pub fn validate_signup(new_user: &NewUser) -> Result<(), &'static str> {
    validate_username(&new_user.username)?;
    validate_email(&new_user.email)?;
    if !password_has_min_chars(&new_user.password) {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}
