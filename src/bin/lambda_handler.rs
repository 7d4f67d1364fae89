//! AWS Lambda handler for the quotation API
//!
//! Supports Lambda Function URLs for direct HTTP access. The engine is built
//! once per cold start and shared across invocations.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use health_quote::{api, PremiumEngine, RatingError, RatingTables};
use lambda_http::{run, service_fn, Body, Error, Request, Response};

/// Load tables from `RATING_TABLES_PATH` when set, otherwise use the built-in workbook values
fn load_engine() -> Result<PremiumEngine, RatingError> {
    let tables = match std::env::var("RATING_TABLES_PATH") {
        Ok(path) => RatingTables::from_csv_path(Path::new(&path))?,
        Err(_) => RatingTables::default_pricing(),
    };
    Ok(PremiumEngine::new(tables))
}

/// Lambda handler function
async fn handler(engine: &PremiumEngine, event: Request) -> Result<Response<Body>, Error> {
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let reply = api::route(engine, event.method().as_str(), event.uri().path(), &body_str, Utc::now());

    let body = if reply.body.is_null() {
        Body::Empty
    } else {
        Body::Text(serde_json::to_string(&reply.body)?)
    };

    let response = Response::builder()
        .status(reply.status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(body)?;

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let engine = Arc::new(load_engine()?);
    log::info!("Premium engine ready with {} services", engine.services_configuration().len());

    run(service_fn(move |event: Request| {
        let engine = Arc::clone(&engine);
        async move { handler(&engine, event).await }
    }))
    .await
}
