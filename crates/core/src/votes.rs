//! Vote submission validation.
//!
//! Usernames are self-asserted display names doubling as the uniqueness
//! key; there is no account system behind them. Validation here is the
//! shared front door for both the public submit path and admin edits.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a username in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a username: non-empty after trimming and within the length
/// limit.
pub fn validate_username(username: &str) -> Result<(), String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username exceeds maximum length of {MAX_USERNAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a selected-options list: at least one option must be chosen.
pub fn validate_selected_options(options: &[String]) -> Result<(), String> {
    if options.is_empty() {
        return Err("At least one option must be selected".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_username ---------------------------------------------------

    #[test]
    fn plain_username_accepted() {
        assert!(validate_username("alice").is_ok());
    }

    #[test]
    fn empty_username_rejected() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn whitespace_only_username_rejected() {
        assert!(validate_username("   ").is_err());
    }

    #[test]
    fn overlong_username_rejected() {
        let name = "x".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(validate_username(&name).is_err());
    }

    #[test]
    fn max_length_username_accepted() {
        let name = "x".repeat(MAX_USERNAME_LENGTH);
        assert!(validate_username(&name).is_ok());
    }

    #[test]
    fn multibyte_username_counted_by_chars() {
        // 50 CJK characters is within the limit even though it is 150 bytes.
        let name = "投".repeat(MAX_USERNAME_LENGTH);
        assert!(validate_username(&name).is_ok());
    }

    // -- validate_selected_options -------------------------------------------

    #[test]
    fn non_empty_options_accepted() {
        assert!(validate_selected_options(&["Red".to_string()]).is_ok());
    }

    #[test]
    fn empty_options_rejected() {
        let result = validate_selected_options(&[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("At least one option"));
    }
}
