//! Route registration and the frozen route table.
//!
//! [`Routes`] is the single-threaded setup phase: handlers are registered by
//! method and path, their descriptors computed and logged. [`Routes::freeze`]
//! turns it into an immutable [`RouteTable`] shared by the host without
//! locking.

use std::sync::Arc;

use http::Method;

use crate::handler::{ErasedHandler, Handler, into_handler};

/// One registered route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: String,
    handler: ErasedHandler,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path pattern, e.g. `/users/{id}`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &ErasedHandler {
        &self.handler
    }
}

/// Collects routes before the server starts.
///
/// ```rust
/// use std::sync::Arc;
/// use rivet_framework::{BoxError, Json, RequestContext, Routes};
///
/// async fn health(_ctx: Arc<RequestContext>) -> Result<Json<&'static str>, BoxError> {
///     Ok(Json("ok"))
/// }
///
/// let table = Routes::new().get("/health", health).freeze();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Routes {
    routes: Vec<Route>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// # Panics
    ///
    /// If a handler is already registered for the same method and path.
    pub fn route<H, Args>(mut self, method: Method, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        let path = path.into();
        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == method && r.path == path)
        {
            panic!(
                "duplicate route `{method} {path}`: already handled by `{}`",
                existing.handler.descriptor().name
            );
        }

        let handler = into_handler(handler);
        self.routes.push(Route {
            method,
            path,
            handler,
        });
        self
    }

    pub fn get<H, Args>(self, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, Args>(self, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, Args>(self, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn delete<H, Args>(self, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    pub fn patch<H, Args>(self, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Ends registration.
    pub fn freeze(self) -> Arc<RouteTable> {
        Arc::new(RouteTable {
            routes: self.routes,
        })
    }
}

/// The immutable set of routes served by the host.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Looks up a route by method and exact path pattern.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.method == *method && r.path == path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rivet_macros::Bind;
    use serde::Deserialize;

    use super::*;
    use crate::context::RequestContext;
    use crate::error::BoxError;
    use crate::handler::{Arity, BindOptions, Json};

    #[derive(Debug, Default, Deserialize, Bind)]
    #[serde(default)]
    struct UserId {
        #[bind(path = "id")]
        id: i64,
    }

    async fn get_user(_ctx: Arc<RequestContext>, req: UserId) -> Result<Json<i64>, BoxError> {
        Ok(Json(req.id))
    }

    async fn delete_user(_ctx: Arc<RequestContext>, _req: UserId) -> Result<(), BoxError> {
        Ok(())
    }

    async fn health(_ctx: Arc<RequestContext>) -> Result<(), BoxError> {
        Ok(())
    }

    #[test]
    fn test_descriptors_are_cached_per_route() {
        let table = Routes::new()
            .get("/users/{id}", get_user)
            .delete("/users/{id}", delete_user)
            .get("/health", health)
            .freeze();

        assert_eq!(table.len(), 3);

        let route = table.find(&Method::GET, "/users/{id}").unwrap();
        let descriptor = route.handler().descriptor();
        assert!(descriptor.name.ends_with("get_user"));
        assert_eq!(descriptor.arity(), Arity::InputOutput);
        assert_eq!(descriptor.input.unwrap().shape.name, "UserId");
        assert_eq!(descriptor.output, Some("i64"));

        let route = table.find(&Method::DELETE, "/users/{id}").unwrap();
        assert_eq!(route.handler().descriptor().arity(), Arity::InputNoOutput);

        let route = table.find(&Method::GET, "/health").unwrap();
        assert_eq!(route.handler().descriptor().arity(), Arity::NoInputNoOutput);

        assert!(table.find(&Method::POST, "/health").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate route `GET /users/{id}`")]
    fn test_duplicate_route_panics() {
        let _ = Routes::new()
            .get("/users/{id}", get_user)
            .get("/users/{id}", get_user);
    }

    #[tokio::test]
    async fn test_erased_handler_call() {
        let table = Routes::new().get("/users/{id}", get_user).freeze();
        let route = table.find(&Method::GET, "/users/{id}").unwrap();

        let ctx = RequestContext::builder(Method::GET, "/users/9")
            .path_param("id", "9")
            .build();
        let value = route
            .handler()
            .call(Arc::new(ctx), BindOptions::default())
            .await
            .unwrap();
        assert_eq!(value, Some(serde_json::json!(9)));
    }

    #[test]
    fn test_erased_handler_without_output() {
        let table = Routes::new().delete("/users/{id}", delete_user).freeze();
        let route = table.find(&Method::DELETE, "/users/{id}").unwrap();

        let ctx = RequestContext::builder(Method::DELETE, "/users/9")
            .path_param("id", "9")
            .build();
        let value =
            tokio_test::block_on(route.handler().call(Arc::new(ctx), BindOptions::default()));
        assert_eq!(value.unwrap(), None);
    }
}
