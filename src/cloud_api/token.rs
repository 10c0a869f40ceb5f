use crate::cloud_api::types::TokenError;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// base64url that accepts segments with or without `=` padding
const JWT_SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from a Bambu Cloud access token
///
/// Only `username` is consulted. Other claims the service puts in the token
/// are ignored, and claims of an unexpected type read as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct UnverifiedClaims {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp, fractional part dropped)
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub exp: Option<i64>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let Some(Value::Number(n)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    }))
}

/// Decode JWT claims without verifying the signature
///
/// The token comes straight from the login endpoint over TLS and this client
/// has no verification key, so this only extracts data: the header must be a
/// JSON object but its `alg` is not interpreted, and the signature segment is
/// never looked at. It must never be used as an authentication or
/// authorization check.
pub fn decode_claims_unverified(jwt: &str) -> Result<UnverifiedClaims, TokenError> {
    let mut segments = jwt.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let header: Value = decode_segment(header, "header")?;
    if !header.is_object() {
        return Err(TokenError::Malformed("header is not a JSON object".to_string()));
    }

    decode_segment(payload, "claims")
}

fn decode_segment<T: DeserializeOwned>(segment: &str, part: &str) -> Result<T, TokenError> {
    let bytes = JWT_SEGMENT
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("{} is not base64url: {}", part, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("{} is not valid JSON: {}", part, e)))
}

/// Bearer credential plus the username extracted from it
///
/// A `Token` always carries a non-empty username. It is immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    username: String,
    jwt: String,
    exp: Option<i64>,
}

impl Token {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The raw JWT, as sent in the `Authorization` header
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    /// Expiry claim, if the token carries one
    ///
    /// Informational only: the client never refreshes tokens.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

impl TryFrom<String> for Token {
    type Error = TokenError;

    fn try_from(jwt: String) -> Result<Self, Self::Error> {
        tracing::debug!("Decoding access token (length: {})", jwt.len());

        let claims = decode_claims_unverified(&jwt).map_err(|e| {
            tracing::error!("Failed to decode access token: {}", e);
            e
        })?;

        let username = claims
            .username
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                tracing::error!("Access token has no username claim");
                TokenError::MissingUsername
            })?;

        Ok(Self {
            username,
            jwt,
            exp: claims.exp,
        })
    }
}

impl TryFrom<&str> for Token {
    type Error = TokenError;

    fn try_from(jwt: &str) -> Result<Self, Self::Error> {
        Token::try_from(jwt.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("username", &self.username)
            .field("jwt", &format_args!("<{} bytes>", self.jwt.len()))
            .field("exp", &self.exp)
            .finish()
    }
}
