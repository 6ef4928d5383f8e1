//! Credential parsing and verification.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use showtime_core::clock::Clock;

use super::claims::Claims;
use super::error::TokenError;

/// Header algorithms accepted by [`JwtDecoder::parse`].
const ACCEPTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Verifies credentials signed with one HMAC secret.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder for the given secret.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Parses and verifies a credential.
    ///
    /// Checks, in order:
    /// 1. Header algorithm is in the HMAC family
    /// 2. Signature
    /// 3. Expiry against the injected clock
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        check_algorithm(token)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                    TokenError::UnsupportedAlgorithm("unknown".to_string())
                }
                JwtErrorKind::InvalidToken
                | JwtErrorKind::Base64(_)
                | JwtErrorKind::Json(_)
                | JwtErrorKind::Utf8(_)
                | JwtErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                _ => TokenError::InvalidSignature,
            }
        })?;

        let claims = data.claims;
        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Rejects any header whose `alg` is outside the HMAC family before key
/// material is touched.
fn check_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    if ACCEPTED_ALGORITHMS.contains(&header.alg.as_str()) {
        Ok(())
    } else {
        Err(TokenError::UnsupportedAlgorithm(header.alg))
    }
}
