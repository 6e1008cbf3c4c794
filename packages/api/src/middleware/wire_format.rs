//! JSON / binary protobuf negotiation for request and response bodies.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

pub const PROTOBUF_MEDIA_TYPES: [&str; 2] = ["application/x-protobuf", "application/protobuf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Json,
    Protobuf,
}

impl WireFormat {
    /// Format of the request body, from `Content-Type`.
    pub fn of_body(headers: &HeaderMap) -> Self {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                if is_protobuf(v) {
                    WireFormat::Protobuf
                } else {
                    WireFormat::Json
                }
            })
            .unwrap_or_default()
    }

    /// Format the client wants back, from `Accept`.
    pub fn accepted(headers: &HeaderMap) -> Self {
        let wants_protobuf = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(is_protobuf);
        if wants_protobuf {
            WireFormat::Protobuf
        } else {
            WireFormat::Json
        }
    }
}

fn is_protobuf(media_range: &str) -> bool {
    let mut parts = media_range.split(';');
    let media_type = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let refused = parts.any(|p| {
        let p = p.trim().replace(' ', "");
        p == "q=0" || p == "q=0.0"
    });
    !refused && PROTOBUF_MEDIA_TYPES.contains(&media_type.as_str())
}

/// Extracts the response format the caller asked for.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFormat(pub WireFormat);

impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ResponseFormat(WireFormat::accepted(&parts.headers)))
    }
}

/// A request message decoded from JSON or protobuf, per `Content-Type`.
/// An empty body decodes to the message's default value.
#[derive(Debug, Clone)]
pub struct WireBody<T>(pub T);

impl<S, T> FromRequest<S> for WireBody<T>
where
    S: Send + Sync,
    T: prost::Message + Default + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = WireFormat::of_body(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Ok(WireBody(T::default()));
        }

        let message = match format {
            WireFormat::Json => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::MalformedRequest(format!("invalid JSON body: {}", e)))?,
            WireFormat::Protobuf => T::decode(bytes).map_err(|e| {
                ApiError::MalformedRequest(format!("invalid protobuf body: {}", e))
            })?,
        };
        Ok(WireBody(message))
    }
}

/// A response message rendered in the negotiated format.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub format: WireFormat,
    pub message: T,
}

impl<T> Reply<T> {
    pub fn new(format: WireFormat, message: T) -> Self {
        Reply { format, message }
    }
}

impl<T> IntoResponse for Reply<T>
where
    T: prost::Message + Serialize,
{
    fn into_response(self) -> Response {
        match self.format {
            WireFormat::Json => Json(self.message).into_response(),
            WireFormat::Protobuf => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(PROTOBUF_MEDIA_TYPES[0]),
                )],
                self.message.encode_to_vec(),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: header::HeaderName, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_body_format_from_content_type() {
        assert_eq!(WireFormat::of_body(&HeaderMap::new()), WireFormat::Json);
        assert_eq!(
            WireFormat::of_body(&headers(header::CONTENT_TYPE, "application/json")),
            WireFormat::Json
        );
        assert_eq!(
            WireFormat::of_body(&headers(
                header::CONTENT_TYPE,
                "Application/X-Protobuf; charset=binary"
            )),
            WireFormat::Protobuf
        );
    }

    #[test]
    fn test_accept_negotiation() {
        assert_eq!(WireFormat::accepted(&HeaderMap::new()), WireFormat::Json);
        assert_eq!(
            WireFormat::accepted(&headers(header::ACCEPT, "*/*")),
            WireFormat::Json
        );
        assert_eq!(
            WireFormat::accepted(&headers(
                header::ACCEPT,
                "application/json;q=0.5, application/protobuf"
            )),
            WireFormat::Protobuf
        );
        assert_eq!(
            WireFormat::accepted(&headers(header::ACCEPT, "application/x-protobuf;q=0")),
            WireFormat::Json
        );
    }
}
