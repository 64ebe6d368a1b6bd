//! Identity records.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    /// Bumped on token revocation; part of the session auth hash.
    pub token_version: i64,
}

/// Lower-cased, trimmed email used as the lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
