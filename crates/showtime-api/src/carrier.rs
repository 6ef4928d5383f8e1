//! Credential carriers: cookies and the bearer header.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use showtime_core::error::AppError;

/// Cookie holding the access credential.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie holding the refresh credential.
pub const REFRESH_COOKIE: &str = "refresh_token";

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Read a named cookie from the request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == name && !val.trim().is_empty() {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}

/// Token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// The access credential, cookie first then bearer header.
pub fn access_credential(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, ACCESS_COOKIE).or_else(|| bearer_token(headers))
}

/// The refresh credential. Only carried in its cookie.
pub fn refresh_credential(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, REFRESH_COOKIE)
}

/// Build a `Set-Cookie` value for a credential.
pub fn set_cookie(
    name: &str,
    value: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, AppError> {
    let mut cookie =
        format!("{name}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid cookie value for {name}: {e}")))
}

/// Build a `Set-Cookie` value that removes a credential cookie.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie =
        format!("{name}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Expires={EPOCH_EXPIRES}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid cookie value for {name}: {e}")))
}
