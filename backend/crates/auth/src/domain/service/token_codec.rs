//! Token Codec
//!
//! Compact `header.payload.signature` tokens, each part unpadded base64url.
//! The signature is HMAC-SHA256 over `header.payload`. Only `HS256` is
//! accepted and the signature is checked before the payload is parsed.

use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::entity::claims::{CLAIMS_VERSION, Claims};
use crate::domain::entity::token_profile::TokenSecret;

const ALGORITHM: &str = "HS256";
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed, wrong algorithm, bad signature, or unknown schema
    #[error("invalid token")]
    Invalid,

    /// Authentic but past `exp`
    #[error("token expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

pub fn sign(claims: &Claims, secret: &TokenSecret) -> Result<String, TokenError> {
    let payload = serde_json::to_vec(claims).map_err(|e| TokenError::Signing(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        to_base64url(HEADER_JSON.as_bytes()),
        to_base64url(&payload)
    );
    let tag = hmac_sha256(secret.as_bytes(), signing_input.as_bytes())
        .map_err(|e| TokenError::Signing(e.to_string()))?;

    Ok(format!("{}.{}", signing_input, to_base64url(&tag)))
}

/// Verify signature, schema version and expiry (`exp <= now` is expired)
pub fn verify(token: &str, secret: &TokenSecret, now: i64) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Invalid);
    };

    let header_bytes = from_base64url(header_b64).map_err(|_| TokenError::Invalid)?;
    let header: Header = serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Invalid)?;
    if header.alg != ALGORITHM {
        return Err(TokenError::Invalid);
    }

    let signature = from_base64url(signature_b64).map_err(|_| TokenError::Invalid)?;
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    let authentic = verify_hmac_sha256(secret.as_bytes(), signing_input.as_bytes(), &signature)
        .map_err(|_| TokenError::Invalid)?;
    if !authentic {
        return Err(TokenError::Invalid);
    }

    let payload = from_base64url(payload_b64).map_err(|_| TokenError::Invalid)?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;
    if claims.ver != CLAIMS_VERSION {
        return Err(TokenError::Invalid);
    }
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
