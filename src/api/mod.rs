//! Transport-independent HTTP API over the premium engine
//!
//! [`route`] maps a method, path and raw body to a status code and JSON body.
//! The Lambda binary is a thin adapter around it.

mod calculator;
mod quotation;

pub use quotation::{QuotationRequest, QUOTE_VALIDITY_DAYS};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::quote::PremiumEngine;

/// Name reported by the health and discovery endpoints
pub const SERVICE_NAME: &str = "MIA Health Calculator API";

/// Status code and JSON payload of a handled request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    /// `Value::Null` means an empty body
    pub body: Value,
}

impl ApiReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `{success: true, data}` with status 200
    pub fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::new(200, json!({ "success": true, "data": data })),
            Err(e) => Self::internal_error(&format!("Error serializing response: {}", e)),
        }
    }

    /// `{success: false, error, message?}` with the given status
    pub fn failure(status: u16, error: &str, message: Option<&str>) -> Self {
        let mut body = json!({ "success": false, "error": error });
        if let Some(message) = message {
            body["message"] = json!(message);
        }
        Self::new(status, body)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, "Internal Server Error", Some(message))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Dispatch a request to its handler
pub fn route(engine: &PremiumEngine, method: &str, path: &str, body: &str, now: DateTime<Utc>) -> ApiReply {
    let path = path.trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let reply = match (method, segments.as_slice()) {
        ("OPTIONS", _) => ApiReply::new(200, Value::Null),
        ("GET", ["health"]) => health(now),
        ("GET", ["api"]) => api_info(),
        ("POST", ["api", "quotation", "calculate"]) => quotation::calculate(engine, body, now),
        ("GET", ["api", "quotation", "plans"]) => quotation::plans(engine),
        ("GET", ["api", "quotation", "coverage", plan]) => quotation::coverage(engine, plan),
        ("POST", ["api", "quotation", "validate"]) => quotation::validate(engine, body),
        ("GET", ["api", "calculator", "price-table"]) => calculator::price_table(engine),
        ("GET", ["api", "calculator", "compare", age]) => calculator::compare(engine, age),
        ("GET", ["api", "calculator", "factors"]) => calculator::factors(engine),
        _ => ApiReply::new(
            404,
            json!({
                "error": "Not Found",
                "message": format!("Route {} {} not found", method, if path.is_empty() { "/" } else { path }),
            }),
        ),
    };

    if reply.is_success() {
        info!("{} {} -> {}", method, path, reply.status);
    } else {
        warn!("{} {} -> {}", method, path, reply.status);
    }
    reply
}

fn health(now: DateTime<Utc>) -> ApiReply {
    ApiReply::new(
        200,
        json!({
            "status": "healthy",
            "timestamp": now.to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
            "service": SERVICE_NAME,
        }),
    )
}

fn api_info() -> ApiReply {
    ApiReply::new(
        200,
        json!({
            "name": "MIA Health Insurance Calculator API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API para cálculo de primas de seguro de salud",
            "endpoints": {
                "quotation": "/api/quotation/*",
                "calculator": "/api/calculator/*",
                "health": "/health",
            },
        }),
    )
}
