//! HTTP contract layer.
//!
//! Framework-agnostic: [`handle`] maps a method plus query parameters to a
//! status code, headers and JSON body, so any front end (or the CLI) can
//! mount it. The contract:
//!
//! - `GET` with `id` (required), `title`, `author`, `duration` (optional)
//! - `OPTIONS` pre-flight succeeds trivially with no body
//! - any other method -> 405
//! - missing `id` -> 400, no upstream calls attempted
//! - success -> 200 `{success: true, source, [instance], ...payload fields}`
//! - all strategies exhausted -> 404 with the attempts map
//! - internal fault -> 500 `{success: false, error, message}`
//!
//! Every response carries permissive CORS headers.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::resolver::domain::{ResolutionRequest, ResolvedResult};
use crate::resolver::service::Resolver;
use crate::resolver::traits::{InstanceApi, SaavnApi};

/// An inbound request, already parsed by whatever front end mounts us.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method, case-insensitive
    pub method: String,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl ApiRequest {
    /// Build a GET request from key/value pairs.
    pub fn get<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: "GET".to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An outbound response for the front end to serialize.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Headers to set (CORS on every response)
    pub headers: Vec<(&'static str, String)>,
    /// JSON body, absent for the pre-flight response
    pub body: Option<Value>,
}

fn cors_headers() -> Vec<(&'static str, String)> {
    vec![
        ("Access-Control-Allow-Origin", "*".to_string()),
        ("Access-Control-Allow-Methods", "GET, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers", "Content-Type".to_string()),
    ]
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        headers: cors_headers(),
        body: Some(body),
    }
}

/// Handle one request end to end.
pub async fn handle<S: SaavnApi, A: InstanceApi, B: InstanceApi>(
    resolver: &Resolver<S, A, B>,
    request: &ApiRequest,
) -> ApiResponse {
    match request.method.to_ascii_uppercase().as_str() {
        "OPTIONS" => ApiResponse {
            status: 204,
            headers: cors_headers(),
            body: None,
        },
        "GET" => handle_get(resolver, &request.params).await,
        _ => respond(
            405,
            json!({"success": false, "error": "method not allowed"}),
        ),
    }
}

async fn handle_get<S: SaavnApi, A: InstanceApi, B: InstanceApi>(
    resolver: &Resolver<S, A, B>,
    params: &HashMap<String, String>,
) -> ApiResponse {
    let Some(id) = params.get("id").filter(|id| !id.is_empty()) else {
        return respond(
            400,
            json!({"success": false, "error": "missing required parameter: id"}),
        );
    };

    // An unparseable duration is dropped rather than rejected - the hint is
    // optional and the strict scorer simply won't run.
    let duration = params.get("duration").and_then(|raw| {
        let parsed = raw.parse::<u32>().ok();
        if parsed.is_none() {
            tracing::warn!(duration = %raw, "ignoring non-integer duration hint");
        }
        parsed
    });

    let resolution = ResolutionRequest {
        id: id.clone(),
        title: params.get("title").cloned().filter(|t| !t.is_empty()),
        author: params.get("author").cloned().filter(|a| !a.is_empty()),
        duration,
    };

    match resolver.resolve(&resolution).await {
        Ok(result) => success_response(result),
        Err(failure) => match serde_json::to_value(&failure.attempts) {
            Ok(attempts) => respond(
                404,
                json!({
                    "success": false,
                    "error": "all resolution strategies failed",
                    "attempts": attempts,
                }),
            ),
            Err(e) => internal_error(e.to_string()),
        },
    }
}

/// Build the 200 body: contract fields first, then the source-specific
/// payload fields spread into the same object.
fn success_response(result: ResolvedResult) -> ApiResponse {
    let mut body = serde_json::Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert(
        "source".to_string(),
        Value::String(result.source.as_str().to_string()),
    );
    if let Some(instance) = result.instance {
        body.insert("instance".to_string(), Value::String(instance));
    }
    match result.payload {
        Value::Object(fields) => body.extend(fields),
        // Non-object upstream bodies (valid JSON, wrong shape) are nested
        // rather than dropped.
        other => {
            body.insert("data".to_string(), other);
        }
    }
    respond(200, Value::Object(body))
}

/// Unanticipated internal fault: generic 500 without detail leakage beyond
/// a message string.
fn internal_error(message: String) -> ApiResponse {
    respond(
        500,
        json!({"success": false, "error": "internal error", "message": message}),
    )
}
