use garde::Error;

/// The symbols accepted by the password policy.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validates a username.
///
/// # Arguments
///
/// * `value` - The username to validate.
///
/// # Returns
///
/// A `garde::Result` indicating whether the username is valid.
pub fn username(value: &str, _context: &()) -> garde::Result {
    if value.len() < 3 {
        return Err(Error::new("Username must be at least 3 characters long"));
    }

    if value.len() > 255 {
        return Err(Error::new("Username must be at most 255 characters"));
    }

    if !value.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(Error::new(
            "Username can only contain letters, numbers, underscores, and hyphens",
        ));
    }

    Ok(())
}

/// Validates an email address against the pattern
/// `local@domain.tld` with a TLD of at least 2 alphabetic characters.
///
/// # Arguments
///
/// * `value` - The email address to validate.
///
/// # Returns
///
/// A `garde::Result` indicating whether the address is valid.
pub fn email(value: &str, _context: &()) -> garde::Result {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(Error::new("Invalid email format"));
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return Err(Error::new("Invalid email format"));
    }

    if domain.is_empty()
        || !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(Error::new("Invalid email format"));
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(Error::new("Invalid email format"));
    };

    if host.is_empty() || tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::new("Invalid email format"));
    }

    Ok(())
}

/// Validates a password against the strength policy: length >= 8 with at
/// least one uppercase letter, one lowercase letter, one digit, and one
/// symbol from [`PASSWORD_SYMBOLS`].
///
/// # Arguments
///
/// * `value` - The password to validate.
///
/// # Returns
///
/// A `garde::Result` indicating whether the password is strong enough.
pub fn password(value: &str, _context: &()) -> garde::Result {
    if value.len() < 8 {
        return Err(Error::new("Password must be at least 8 characters long"));
    }

    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::new("Password must contain an uppercase letter"));
    }

    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(Error::new("Password must contain a lowercase letter"));
    }

    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::new("Password must contain a digit"));
    }

    if !value.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(Error::new("Password must contain a special character"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_without_symbol_is_rejected() {
        assert!(password("Abc12345", &()).is_err());
    }

    #[test]
    fn password_with_all_classes_is_accepted() {
        assert!(password("Abc123!@", &()).is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(password("abc", &()).is_err());
    }

    #[test]
    fn password_missing_one_class_is_rejected() {
        assert!(password("abc123!@", &()).is_err()); // no uppercase
        assert!(password("ABC123!@", &()).is_err()); // no lowercase
        assert!(password("Abcdefg!", &()).is_err()); // no digit
    }

    #[test]
    fn well_formed_email_is_accepted() {
        assert!(email("jane.doe+health@example-clinic.co", &()).is_ok());
    }

    #[test]
    fn email_without_at_or_tld_is_rejected() {
        assert!(email("jane.doe.example.com", &()).is_err());
        assert!(email("jane@example", &()).is_err());
        assert!(email("jane@example.c", &()).is_err());
        assert!(email("jane@.com", &()).is_err());
        assert!(email("@example.com", &()).is_err());
    }

    #[test]
    fn email_with_illegal_characters_is_rejected() {
        assert!(email("ja ne@example.com", &()).is_err());
        assert!(email("jane@exa mple.com", &()).is_err());
        assert!(email("jane@example.c0m", &()).is_err());
    }

    #[test]
    fn username_policy() {
        assert!(username("meghana_g", &()).is_ok());
        assert!(username("ab", &()).is_err());
        assert!(username("has space", &()).is_err());
    }
}
