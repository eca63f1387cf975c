//! Typed token headers
//!
//! Tokens travel exclusively in these custom headers, never in cookies.

use axum::http::{HeaderName, HeaderValue};
use headers::{Error, Header};
use uuid::Uuid;

pub static X_ACCESS_TOKEN: HeaderName = HeaderName::from_static("x-access-token");
pub static X_REFRESH_TOKEN: HeaderName = HeaderName::from_static("x-refresh-token");
pub static X_USER_ID: HeaderName = HeaderName::from_static("_id");

fn decode_str<'i, I>(values: &mut I) -> Result<String, Error>
where
    I: Iterator<Item = &'i HeaderValue>,
{
    values
        .next()
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(Error::invalid)
}

fn encode_str<E: Extend<HeaderValue>>(value: &str, values: &mut E) {
    if let Ok(value) = HeaderValue::from_str(value) {
        values.extend(std::iter::once(value));
    }
}

/// `x-access-token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl Header for AccessToken {
    fn name() -> &'static HeaderName {
        &X_ACCESS_TOKEN
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_str(values).map(AccessToken)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_str(&self.0, values)
    }
}

/// `x-refresh-token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken(pub String);

impl Header for RefreshToken {
    fn name() -> &'static HeaderName {
        &X_REFRESH_TOKEN
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_str(values).map(RefreshToken)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_str(&self.0, values)
    }
}

/// `_id`, the user a refresh token is presented for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

impl Header for UserId {
    fn name() -> &'static HeaderName {
        &X_USER_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let raw = decode_str(values)?;
        Uuid::parse_str(&raw)
            .map(UserId)
            .map_err(|_| Error::invalid())
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_str(&self.0.to_string(), values)
    }
}
