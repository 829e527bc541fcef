//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one spawned task per connection. Routing is a
//! plain match on method and path: six resource mounts plus health probes.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::db::schemas::{
    Article, HelpRequest, MenuItemReview, RecommendationRequest, UcsbDiningCommonsMenuItem,
    UcsbOrganization,
};
use crate::db::MongoClient;
use crate::resource::MemoryDb;
use crate::routes;
use crate::types::Result;

type FullBody = Full<Bytes>;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Connected MongoDB client; None in dev mode without a database
    pub mongo: Option<MongoClient>,
    /// In-memory store backing dev mode
    pub mem: Arc<MemoryDb>,
}

impl AppState {
    pub fn new(args: Args, mongo: Option<MongoClient>) -> Self {
        Self {
            args,
            mongo,
            mem: Arc::new(MemoryDb::new()),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Registrar listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - insecure JWT secret in use");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<FullBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Resource mounts, one per record kind
    if let Some(sub) = path.strip_prefix("/api/articles") {
        let sub = sub.to_string();
        return Ok(routes::handle_resource_request::<Article, _>(req, state, &sub).await);
    }
    if let Some(sub) = path.strip_prefix("/api/helprequests") {
        let sub = sub.to_string();
        return Ok(routes::handle_resource_request::<HelpRequest, _>(req, state, &sub).await);
    }
    if let Some(sub) = path.strip_prefix("/api/menuitemreviews") {
        let sub = sub.to_string();
        return Ok(routes::handle_resource_request::<MenuItemReview, _>(req, state, &sub).await);
    }
    if let Some(sub) = path.strip_prefix("/api/recommendationrequest") {
        let sub = sub.to_string();
        return Ok(
            routes::handle_resource_request::<RecommendationRequest, _>(req, state, &sub).await,
        );
    }
    if let Some(sub) = path.strip_prefix("/api/UCSBDiningCommonsMenuItem") {
        let sub = sub.to_string();
        return Ok(
            routes::handle_resource_request::<UcsbDiningCommonsMenuItem, _>(req, state, &sub)
                .await,
        );
    }
    if let Some(sub) = path.strip_prefix("/api/ucsborganizations") {
        let sub = sub.to_string();
        return Ok(routes::handle_resource_request::<UcsbOrganization, _>(req, state, &sub).await);
    }

    let response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(state),

        // Readiness probe
        (Method::GET, "/ready") | (Method::GET, "/readyz") => routes::readiness_check(state),

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // CORS preflight
        (Method::OPTIONS, _) => preflight_response(),

        // Not found
        _ => not_found_response(&path),
    };

    Ok(response)
}

/// CORS preflight response
fn preflight_response() -> Response<FullBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        )
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Not found response
fn not_found_response(path: &str) -> Response<FullBody> {
    let body = serde_json::json!({
        "error": "Not Found",
        "path": path,
    });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
