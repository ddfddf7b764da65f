//! Custom axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// Body answered when a write endpoint receives a non-JSON payload.
pub const JSON_REQUIRED: &str = "Error: Data must be sent as JSON.";

/// JSON body extractor preserving the legacy wire contract: a request
/// without an `application/json` content type is answered with HTTP 200
/// and a plain-text error body instead of a 4xx rejection. Malformed
/// JSON under the right content type is still a [`ServerError::Json`].
pub struct LegacyJson<T>(pub T);

impl<S, T> FromRequest<S> for LegacyJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(&req) {
            return Err(JSON_REQUIRED.into_response());
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| err.into_response())?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|err| ServerError::Json(err).into_response())?;

        Ok(Self(value))
    }
}

/// Accepts `application/json` with or without parameters such as a
/// charset; a missing header counts as non-JSON.
fn has_json_content_type(req: &Request) -> bool {
    let Some(content_type) = req.headers().get(CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|mime| mime.eq_ignore_ascii_case("application/json"))
}
