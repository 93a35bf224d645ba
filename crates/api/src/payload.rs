//! Request parameter extractor.
//!
//! Endpoints accept their parameters from the query string, a JSON object
//! body, or a form-urlencoded body, merged into one flat map. Reading goes
//! through the lenient accessors below so that type-confused input reads as
//! "missing" instead of failing deserialization.
//!
//! Any body rejection is converted into the JSON failure envelope; axum's
//! plain-text rejections never reach the client.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::Form;
use serde_json::{Map, Value};
use trakker_core::coerce::{as_i64, as_text, is_blank};
use trakker_core::messages;

use crate::error::AppError;
use crate::state::AppState;

/// Flat request parameters: query string overlaid by the body.
#[derive(Debug, Clone, Default)]
pub struct Payload(pub Map<String, Value>);

impl Payload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The first non-blank value among `keys` (aliases for one parameter).
    pub fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !is_blank(Some(v)))
    }

    /// Trimmed text of the first non-blank alias.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.first(keys).and_then(as_text)
    }

    /// Integer value of the first non-blank alias.
    pub fn int(&self, keys: &[&str]) -> Option<i64> {
        self.first(keys).and_then(as_i64)
    }

    /// Whether any alias carries a non-blank value.
    pub fn has(&self, keys: &[&str]) -> bool {
        self.first(keys).is_some()
    }
}

impl FromRequest<AppState> for Payload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut params = Map::new();

        if req.uri().query().is_some() {
            let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map_err(|_| AppError::BadRequest(messages::MALFORMED_BODY.into()))?;
            merge_pairs(&mut params, pairs);
        }

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::BadRequest(messages::MALFORMED_BODY.into())
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(params));
        }

        if is_form {
            let form_req = Request::builder()
                .method(Method::POST)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(bytes))
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(form_req, state)
                .await
                .map_err(|_| AppError::BadRequest(messages::MALFORMED_BODY.into()))?;
            merge_pairs(&mut params, pairs);
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(body)) => params.extend(body),
                _ => return Err(AppError::BadRequest(messages::MALFORMED_BODY.into())),
            }
        }

        Ok(Payload(params))
    }
}

/// Merge urlencoded pairs. Keys ending in `[]` accumulate into an array
/// under the bare key; other repeated keys keep the last value.
fn merge_pairs(params: &mut Map<String, Value>, pairs: Vec<(String, String)>) {
    for (key, value) in pairs {
        match key.strip_suffix("[]") {
            Some(bare) => {
                let slot = params
                    .entry(bare.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(items) => items.push(Value::String(value)),
                    other => *other = Value::Array(vec![Value::String(value)]),
                }
            }
            None => {
                params.insert(key, Value::String(value));
            }
        }
    }
}
