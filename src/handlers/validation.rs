//! Field-level input validators shared by registration and profile update.

/// Validate username format and requirements
pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if username.len() > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }

    // Allow alphanumeric, underscore, hyphen
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    // Must start with alphanumeric
    if !username.chars().next().is_some_and(|c| c.is_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

/// Basic email format check
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Password must be non-empty; hashing handles the rest
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    Ok(())
}

/// Optional phone number, at most 15 characters
pub fn validate_phone_format(phone: &str) -> Result<(), String> {
    if phone.len() > 15 {
        return Err("Phone must be at most 15 characters".to_string());
    }
    if !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ') {
        return Err("Phone can only contain digits, '+', '-', and spaces".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username_format("alice").is_ok());
        assert!(validate_username_format("a1_b-c").is_ok());
        assert!(validate_username_format("").is_err());
        assert!(validate_username_format("ab").is_err());
        assert!(validate_username_format("_alice").is_err());
        assert!(validate_username_format("al ice").is_err());
        assert!(validate_username_format(&"x".repeat(51)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email_format("alice@example.com").is_ok());
        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("alice").is_err());
        assert!(validate_email_format("@example.com").is_err());
        assert!(validate_email_format("alice@").is_err());
        assert!(validate_email_format("a@b@c.com").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone_format("+7 999 123-45-67").is_ok());
        assert!(validate_phone_format("1234567890123456").is_err());
        assert!(validate_phone_format("phone").is_err());
    }
}
