use biblioteca_shared::{users, AppState};
use lambda_http::{http::StatusCode, Body, Error, Request, Response};
use std::sync::Arc;

/// Main Lambda handler - routes requests to the users endpoint
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let origin = state.config.allowed_origin.as_str();
    tracing::info!("🚀 Biblioteca API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", origin)
            .header("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .map_err(Box::new)?);
    }

    if path.trim_end_matches('/') == state.config.users_route.trim_end_matches('/') {
        return users::handle_users(state.directory.as_ref(), method, body, origin).await;
    }

    // No matching route
    tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
    not_found(origin)
}

fn not_found(origin: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", origin)
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
