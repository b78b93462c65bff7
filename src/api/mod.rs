//! Inference API endpoints and CORS policy.
//!
//! Handlers are plain functions from a request to a response, registered on
//! the router at startup. The HTTP core never looks inside a body; JSON
//! parsing and input validation all happen here.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::router::Router;
use crate::inference::Engine;

/// Cross-origin policy computed once at startup.
#[derive(Clone)]
pub struct CorsPolicy {
    allow_origin: Option<String>,
}

impl CorsPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            allow_origin: cfg.allow_origin.clone(),
        }
    }

    /// Adds the CORS headers to a response under construction. The origin
    /// header is omitted entirely when no origin is allowed.
    fn apply(&self, mut builder: ResponseBuilder) -> ResponseBuilder {
        if let Some(origin) = &self.allow_origin {
            builder = builder.header("Access-Control-Allow-Origin", origin.clone());
        }
        builder
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
    }
}

#[derive(Serialize)]
struct PredictReply {
    y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorReply {
    error: String,
}

/// Builds the route table: health probe plus the predict endpoint with its
/// CORS preflight.
pub fn routes(engine: Arc<Engine>, cors: CorsPolicy) -> Router {
    let mut router = Router::new();

    router.register("/health", Method::GET, |_req| Response::ok("ok"));

    {
        let cors = cors.clone();
        router.register("/predict", Method::OPTIONS, move |_req| {
            cors.apply(ResponseBuilder::new(StatusCode::NoContent)).build()
        });
    }

    router.register("/predict", Method::POST, move |req| {
        predict(&engine, &cors, req)
    });

    router
}

fn predict(engine: &Engine, cors: &CorsPolicy, req: &Request) -> Response {
    let body: Value = match serde_json::from_slice(&req.body) {
        Ok(v) => v,
        Err(e) => return bad_input(cors, e.to_string()),
    };

    let x = match body.get("x").and_then(Value::as_f64) {
        Some(x) => x as f32,
        None => return bad_input(cors, "x must be a number".to_string()),
    };

    let prediction = engine.predict(x);
    let reply = PredictReply {
        y: prediction.y,
        note: (!prediction.used_model).then_some("dummy"),
    };

    cors.apply(
        ResponseBuilder::new(StatusCode::Ok).header("Content-Type", "application/json"),
    )
    .body(serde_json::to_vec(&reply).unwrap_or_default())
    .build()
}

fn bad_input(cors: &CorsPolicy, message: String) -> Response {
    let reply = ErrorReply { error: message };
    cors.apply(ResponseBuilder::new(StatusCode::BadRequest))
        .body(serde_json::to_vec(&reply).unwrap_or_default())
        .build()
}
