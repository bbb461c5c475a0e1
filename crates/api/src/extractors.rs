//! Request extractors.

use axum::{
    async_trait,
    body::to_bytes,
    extract::{FromRequest, Query, Request},
};
use gateway_core::Error;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::params::Params;
use crate::response::ApiError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// An action call: the action name plus its merged parameters.
///
/// The action comes from the body's `action` field, falling back to the
/// `action` query parameter. GET requests and empty bodies carry query
/// parameters only.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: Option<String>,
    pub params: Params,
}

#[async_trait]
impl<S> FromRequest<S> for ActionRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let query: HashMap<String, String> = Query::try_from_uri(req.uri())
            .map(|Query(q)| q)
            .unwrap_or_default();

        let bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| Error::validation(format!("Failed to read request body: {}", e)))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => Some(map),
                Ok(_) => return Err(Error::validation("Request body must be a JSON object").into()),
                Err(e) => {
                    debug!(error = %e, "Rejected malformed request body");
                    return Err(Error::validation("Invalid JSON body").into());
                }
            }
        };

        let params = Params::merge(query, body);
        let action = params.text("action");

        Ok(Self { action, params })
    }
}
