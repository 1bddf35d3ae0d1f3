//! Input validation functions
//!
//! Plain checks returning a human readable message. The `validator` derive
//! rules on the request types delegate to these through the adapters in
//! [`crate::types`].

use std::sync::OnceLock;

/// Longest accepted recipe title, in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Longest accepted name of a cuisine, allergen, ingredient or author
pub const MAX_NAME_CHARS: usize = 100;

fn login_regex() -> &'static regex_lite::Regex {
    static LOGIN: OnceLock<regex_lite::Regex> = OnceLock::new();
    LOGIN.get_or_init(|| {
        regex_lite::Regex::new(r"^[A-Za-z0-9_.\-]{3,64}$").expect("login pattern is valid")
    })
}

/// Validate a display name (cuisine, allergen, ingredient, first/last name)
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!("Name must be at most {} characters", MAX_NAME_CHARS));
    }
    Ok(())
}

/// Validate a recipe title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(format!("Title must be at most {} characters", MAX_TITLE_CHARS));
    }
    Ok(())
}

/// Validate an author login
pub fn validate_login(login: &str) -> Result<(), String> {
    if !login_regex().is_match(login) {
        return Err(
            "Login must be 3-64 characters of letters, digits, '.', '_' or '-'".to_string(),
        );
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a list of referenced ids (allergen ids in a recipe payload)
pub fn validate_ids(ids: &[i32]) -> Result<(), String> {
    if let Some(bad) = ids.iter().find(|id| **id < 0) {
        return Err(format!("Invalid id: {}", bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Italian").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_title_counts_characters() {
        // 200 two-byte characters is still a valid title
        let title = "щ".repeat(MAX_TITLE_CHARS);
        assert!(validate_title(&title).is_ok());
        assert!(validate_title(&format!("{}щ", title)).is_err());
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("chef_mario").is_ok());
        assert!(validate_login("a.b-c").is_ok());
        assert!(validate_login("ab").is_err());
        assert!(validate_login("has space").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_ids() {
        assert!(validate_ids(&[]).is_ok());
        assert!(validate_ids(&[0, 1, 2]).is_ok());
        assert!(validate_ids(&[1, -1]).is_err());
    }

    proptest! {
        #[test]
        fn prop_titles_within_limit_are_valid(title in "[a-zA-Z][a-zA-Z ]{0,199}") {
            prop_assert!(validate_title(&title).is_ok());
        }
    }
}
