//! Small string helpers shared by the client and its error messages.

/// Replace every character of a secret with `*`.
///
/// The mask keeps the character count of the original so a user can tell
/// which password was sent without it being printed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(mask_secret("secret"), "******");
/// ```
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut and get a `"…(+N bytes)"`
/// suffix. Cuts always land on a character boundary.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}
