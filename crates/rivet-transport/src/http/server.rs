//! Serving a [`RouteTable`] over HTTP with axum.
//!
//! ```text
//! axum Request
//!     → RawPathParams + query + headers + body (bounded)
//!     → RequestContext (headers propagated into the value store)
//!     → ErasedHandler::call
//!     → render()
//! ```
//!
//! All routes sharing a path are merged into one axum method router, so
//! `GET /users/{id}` and `DELETE /users/{id}` live side by side.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{RawPathParams, Request};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter};
use rivet_framework::{BindOptions, ErasedHandler, RequestContext, RouteTable};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::response::{error_response, render};
use crate::error::{TransportError, TransportResult};

/// Default cap on buffered request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Per-request settings applied by the router.
#[derive(Debug, Clone, Copy)]
pub struct RouterSettings {
    /// Bodies larger than this are rejected before binding.
    pub max_body_bytes: usize,
    pub bind: BindOptions,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            bind: BindOptions::default(),
        }
    }
}

/// Builds an axum [`Router`] dispatching to every route in `table`.
pub fn build_router(table: &RouteTable, settings: RouterSettings) -> TransportResult<Router> {
    let mut paths: Vec<(&str, Vec<(MethodFilter, ErasedHandler)>)> = Vec::new();

    for route in table.iter() {
        let filter = MethodFilter::try_from(route.method().clone()).map_err(|_| {
            TransportError::UnsupportedMethod {
                method: route.method().clone(),
                path: route.path().to_string(),
            }
        })?;
        let endpoint = (filter, route.handler().clone());

        match paths.iter_mut().find(|(path, _)| *path == route.path()) {
            Some((_, endpoints)) => endpoints.push(endpoint),
            None => paths.push((route.path(), vec![endpoint])),
        }
        debug!(method = %route.method(), path = route.path(), "Mounted route");
    }

    let mut router = Router::new();
    for (path, endpoints) in paths {
        let methods = endpoints
            .into_iter()
            .fold(MethodRouter::new(), |methods, (filter, handler)| {
                methods.on(filter, move |params: RawPathParams, request: Request| {
                    dispatch(handler.clone(), settings, params, request)
                })
            });
        router = router.route(path, methods);
    }
    Ok(router)
}

async fn dispatch(
    handler: ErasedHandler,
    settings: RouterSettings,
    params: RawPathParams,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();

    let body = match to_bytes(body, settings.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            warn!(path = parts.uri.path(), error = %e, "Failed to read request body");
            return error_response(StatusCode::BAD_REQUEST, &format!("failed to read request body: {e}"));
        }
    };

    let mut builder = RequestContext::builder(parts.method, parts.uri.path())
        .headers(parts.headers)
        .body(body);
    if let Some(query) = parts.uri.query() {
        builder = builder.query(query);
    }
    for (name, value) in params.iter() {
        builder = builder.path_param(name, value);
    }

    let mut ctx = builder.build();
    ctx.propagate_headers();

    render(handler.call(Arc::new(ctx), settings.bind).await)
}

/// Binds `addr`.
pub async fn bind(addr: &str) -> TransportResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> TransportResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listener.local_addr()?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!(addr = %addr, "HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::Method;
    use rivet_framework::{BoxError, Json, Routes};
    use rivet_macros::Bind;
    use serde::Deserialize;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Default, Deserialize, Bind)]
    #[serde(default)]
    struct GetUser {
        #[bind(path = "id")]
        id: i64,
        #[bind(query = "name", default = "user name")]
        name: String,
        #[bind(header = "X-Tenant")]
        tenant: String,
    }

    #[derive(Debug, Default, Deserialize, Bind)]
    #[serde(default)]
    struct UserId {
        #[bind(path = "id")]
        id: i64,
    }

    async fn get_user(_ctx: Arc<RequestContext>, req: GetUser) -> Result<Json<Value>, BoxError> {
        Ok(Json(json!({"id": req.id, "name": req.name, "tenant": req.tenant})))
    }

    async fn delete_user(_ctx: Arc<RequestContext>, req: UserId) -> Result<(), BoxError> {
        if req.id == 13 {
            return Err("cannot delete".into());
        }
        Ok(())
    }

    fn router() -> Router {
        let table = Routes::new()
            .get("/users/{id}", get_user)
            .delete("/users/{id}", delete_user)
            .freeze();
        build_router(&table, RouterSettings::default()).unwrap()
    }

    async fn send(request: http::Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn request(method: Method, uri: &str) -> http::Request<Body> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .header("x-tenant", "acme")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_output_is_wrapped_in_data() {
        let (status, body) = send(request(Method::GET, "/users/42?name=Ann")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"data": {"id": 42, "name": "Ann", "tenant": "acme"}})
        );
    }

    #[tokio::test]
    async fn test_invalid_path_param_is_bad_request() {
        let (status, body) = send(request(Method::GET, "/users/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {"message": "'1' invalid parameter(s): id"}})
        );
    }

    #[tokio::test]
    async fn test_no_output_is_no_content() {
        let (status, body) = send(request(Method::DELETE, "/users/1")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_handler_error_is_server_error() {
        let (status, body) = send(request(Method::DELETE, "/users/13")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": {"message": "cannot delete"}}));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let table = Routes::new().delete("/users/{id}", delete_user).freeze();
        let settings = RouterSettings {
            max_body_bytes: 4,
            ..Default::default()
        };
        let router = build_router(&table, settings).unwrap();

        let request = http::Request::builder()
            .method(Method::DELETE)
            .uri("/users/1")
            .body(Body::from("0123456789"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
