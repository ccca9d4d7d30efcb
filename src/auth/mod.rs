mod helpers;
mod middleware;
mod token;

pub use helpers::{TokenValidationError, extract_token_from_header, validate_token};
pub use middleware::{AuthError, RequireAdmin, RequireUser};
pub use token::{IssuedToken, TOKEN_PREFIX, TokenGenerator, parse_token};
