use chrono::Utc;

use super::{TokenGenerator, parse_token};
use crate::store::Store;
use crate::types::Token;

#[derive(Debug, PartialEq, Eq)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InternalError,
}

/// Extracts a bearer token from the Authorization header.
/// Returns None if no auth header is present.
pub fn extract_token_from_header(
    auth_header: Option<&str>,
) -> Result<Option<String>, TokenValidationError> {
    let Some(header) = auth_header else {
        return Ok(None);
    };

    if let Some(token) = header.strip_prefix("Bearer ") {
        return Ok(Some(token.trim().to_string()));
    }
    Err(TokenValidationError::InvalidScheme)
}

/// Validates a raw token string against the store and records its use.
pub fn validate_token(store: &dyn Store, raw_token: &str) -> Result<Token, TokenValidationError> {
    let (lookup, _secret) =
        parse_token(raw_token).map_err(|_| TokenValidationError::InvalidToken)?;

    let token = store
        .get_token_by_lookup(&lookup)
        .map_err(|e| {
            tracing::error!("Token lookup failed: {e}");
            TokenValidationError::InternalError
        })?
        .ok_or(TokenValidationError::InvalidToken)?;

    let generator = TokenGenerator::new();
    if !generator
        .verify(raw_token, &token.token_hash)
        .map_err(|_| TokenValidationError::InternalError)?
    {
        return Err(TokenValidationError::InvalidToken);
    }

    if token.expires_at.is_some_and(|at| at < Utc::now()) {
        return Err(TokenValidationError::TokenExpired);
    }

    if let Err(e) = store.update_token_last_used(&token.id) {
        tracing::warn!("Failed to update token last_used_at: {e}");
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header(None), Ok(None));
        assert_eq!(
            extract_token_from_header(Some("Bearer abc")),
            Ok(Some("abc".to_string()))
        );

        assert_eq!(
            extract_token_from_header(Some("Basic eC10b2tlbjphYmM=")),
            Err(TokenValidationError::InvalidScheme)
        );
        assert_eq!(
            extract_token_from_header(Some("Digest abc")),
            Err(TokenValidationError::InvalidScheme)
        );
    }

    #[test]
    fn test_validate_token() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        let generator = TokenGenerator::new();

        let issued = generator.issue(&store, true, None, None).unwrap();
        let token = validate_token(&store, &issued.raw).unwrap();
        assert_eq!(token.id, issued.token.id);
        assert!(
            store
                .get_token_by_id(&token.id)
                .unwrap()
                .unwrap()
                .last_used_at
                .is_some()
        );

        let expired = generator
            .issue(&store, true, None, Some(Utc::now() - Duration::hours(1)))
            .unwrap();
        assert_eq!(
            validate_token(&store, &expired.raw).unwrap_err(),
            TokenValidationError::TokenExpired
        );

        assert_eq!(
            validate_token(&store, "coursewright_00000000_abcdefghijklmnopqrstuvwx").unwrap_err(),
            TokenValidationError::InvalidToken
        );
    }
}
