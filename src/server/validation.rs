use crate::server::response::ApiError;

const MAX_SITE_URL_LEN: usize = 63;
const MAX_SITE_NAME_LEN: usize = 100;

/// Site urls are subdomain-style slugs: lowercase alphanumerics and inner hyphens.
pub fn validate_site_url(url: &str) -> Result<(), ApiError> {
    if url.is_empty() {
        return Err(ApiError::bad_request("Site url cannot be empty"));
    }
    if url.len() > MAX_SITE_URL_LEN {
        return Err(ApiError::bad_request(format!(
            "Site url cannot exceed {MAX_SITE_URL_LEN} characters"
        )));
    }
    if !url
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ApiError::bad_request(
            "Site url can only contain lowercase letters, digits, and hyphens",
        ));
    }
    if url.starts_with('-') || url.ends_with('-') {
        return Err(ApiError::bad_request(
            "Site url cannot start or end with a hyphen",
        ));
    }
    Ok(())
}

pub fn validate_site_name(name: &str) -> Result<(), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Site name cannot be empty"));
    }
    if name.chars().count() > MAX_SITE_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Site name cannot exceed {MAX_SITE_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        })
        && !email.chars().any(char::is_whitespace);

    if !valid {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_url_rules() {
        assert!(validate_site_url("pottery-school").is_ok());
        assert!(validate_site_url("").is_err());
        assert!(validate_site_url("Pottery").is_err());
        assert!(validate_site_url("-pottery").is_err());
        assert!(validate_site_url("pottery.school").is_err());
        assert!(validate_site_url(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada @example.com").is_err());
    }
}
