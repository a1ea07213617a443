use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AppError;
use crate::state::AppState;

/// Accepted basic-auth user names and passwords
#[derive(Debug, Clone, Default)]
pub struct BasicCredentials {
    users: HashMap<String, String>,
}

impl BasicCredentials {
    pub fn new(users: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// User authenticated through an `Authorization: Basic` header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Axum extractor that checks basic-auth credentials and returns an [`AuthUser`].
///
/// ```ignore
/// async fn my_handler(user: AuthUser, ...) -> Result<..., AppError> { ... }
/// ```
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let (username, password) = decode_basic(header).ok_or(AppError::Unauthorized)?;
        if !state.credentials.verify(&username, &password) {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser { username })
    }
}

/// Decode `Basic <base64(user:pass)>` into its parts
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        // "john:doe"
        assert_eq!(
            decode_basic("Basic am9objpkb2U="),
            Some(("john".to_string(), "doe".to_string()))
        );
        assert_eq!(
            decode_basic("basic am9objpkb2U="),
            Some(("john".to_string(), "doe".to_string()))
        );
    }

    #[test]
    fn test_decode_basic_rejects_other_schemes() {
        assert_eq!(decode_basic("Bearer am9objpkb2U="), None);
        assert_eq!(decode_basic("Basic"), None);
        assert_eq!(decode_basic("Basic !!!"), None);
        // "johndoe" has no separator
        assert_eq!(decode_basic("Basic am9obmRvZQ=="), None);
    }

    #[test]
    fn test_password_may_contain_colons() {
        let header = format!("Basic {}", STANDARD.encode("admin:a:b"));
        assert_eq!(
            decode_basic(&header),
            Some(("admin".to_string(), "a:b".to_string()))
        );
    }

    #[test]
    fn test_verify() {
        let creds = BasicCredentials::new([("admin".to_string(), "123456".to_string())]);
        assert!(creds.verify("admin", "123456"));
        assert!(!creds.verify("admin", "wrong"));
        assert!(!creds.verify("nobody", "123456"));
    }
}
