//! `ApiKey` extractor: the per-request platform credential.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use filesweep_core::error::AppError;

use crate::error::ApiError;

/// Header carrying the platform API key for this call.
pub const API_KEY_HEADER: &str = "x-appwrite-key";

/// Credential forwarded from the `x-appwrite-key` header, if present.
///
/// A missing header is not an error: the backend falls back to the
/// configured key.
#[derive(Debug, Clone, Default)]
pub struct ApiKey(pub Option<String>);

impl ApiKey {
    /// The key, if the request carried one.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(API_KEY_HEADER) else {
            return Ok(Self(None));
        };
        let key = value
            .to_str()
            .map_err(|_| AppError::authentication("Invalid x-appwrite-key header"))?
            .trim();
        Ok(Self((!key.is_empty()).then(|| key.to_string())))
    }
}
