//! Application wiring: configuration, logging, routes and the HTTP server.
//!
//! ```rust,ignore
//! use rivet_runtime::RivetApp;
//!
//! let mut app = RivetApp::new();
//! app.get("/users/{id}", get_user);
//! app.post("/users", create_user);
//! app.run().await?;
//! ```

use std::mem;
use std::path::Path;

use http::Method;
use rivet_framework::{Handler, Routes};
use tokio::signal;
use tracing::{error, info};

use crate::config::{ConfigLoader, ConfigResult, RivetConfig};
#[cfg(feature = "http-server")]
use crate::config::validate_config;
#[cfg(feature = "http-server")]
use crate::error::RuntimeResult;
use crate::logging;

/// A set of routes plus the configuration they are served with.
pub struct RivetApp {
    config: RivetConfig,
    routes: Routes,
}

impl RivetApp {
    /// Creates an app from the default configuration sources.
    ///
    /// Falls back to built-in defaults when the configuration cannot be loaded.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .with_user_config_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                RivetConfig::default()
            });

        Self::from_config(config)
    }

    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Creates an app from `config`, initializing logging on first use.
    pub fn from_config(config: RivetConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            addr = %config.server.addr,
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            validate = config.binding.validate,
            "Application initialized from configuration"
        );

        Self {
            config,
            routes: Routes::new(),
        }
    }

    pub fn config(&self) -> &RivetConfig {
        &self.config
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// # Panics
    ///
    /// If the method and path are already registered.
    pub fn route<H, Args>(&mut self, method: Method, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.routes = mem::take(&mut self.routes).route(method, path, handler);
        self
    }

    pub fn get<H, Args>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, Args>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, Args>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn delete<H, Args>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    pub fn patch<H, Args>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Serves the registered routes until Ctrl+C or SIGTERM.
    #[cfg(feature = "http-server")]
    pub async fn run(self) -> RuntimeResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serves the registered routes until `shutdown` resolves.
    #[cfg(feature = "http-server")]
    pub async fn run_until<F>(self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        use rivet_transport::http::{RouterSettings, bind, build_router, serve};
        use tracing::debug;

        validate_config(&self.config)?;

        let table = self.routes.freeze();
        let settings = RouterSettings {
            max_body_bytes: self.config.binding.max_body_bytes,
            bind: self.config.binding.bind_options(),
        };
        let router = build_router(&table, settings)?;
        debug!(routes = table.len(), "Router built");

        let listener = bind(&self.config.server.addr).await?;
        serve(listener, router, shutdown).await?;
        Ok(())
    }
}

impl Default for RivetApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// Never resolves if no signal handler can be installed.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Builder for a [`RivetApp`] with custom configuration sources.
///
/// ```rust,ignore
/// let app = RivetApp::builder()
///     .config_file("config/rivet.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct AppBuilder {
    config_loader: ConfigLoader,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: RivetConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub fn build(self) -> ConfigResult<RivetApp> {
        let config = self.config_loader.load()?;
        Ok(RivetApp::from_config(config))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rivet_framework::{BoxError, RequestContext};

    use super::*;
    use crate::config::ServerConfig;

    async fn ping(_ctx: Arc<RequestContext>) -> Result<(), BoxError> {
        Ok(())
    }

    fn config(addr: &str) -> RivetConfig {
        RivetConfig {
            server: ServerConfig { addr: addr.into() },
            ..Default::default()
        }
    }

    #[test]
    fn test_routes_accumulate() {
        let mut app = RivetApp::from_config(config("127.0.0.1:0"));
        app.get("/ping", ping).delete("/ping", ping);
        assert_eq!(app.route_count(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate route")]
    fn test_duplicate_route_panics() {
        let mut app = RivetApp::from_config(config("127.0.0.1:0"));
        app.get("/ping", ping);
        app.get("/ping", ping);
    }

    #[test]
    fn test_builder_merges_config() {
        let app = RivetApp::builder()
            .search_path(std::env::temp_dir().join("rivet-app-builder-test"))
            .without_env()
            .merge(config("127.0.0.1:9999"))
            .build()
            .unwrap();
        assert_eq!(app.config().server.addr, "127.0.0.1:9999");
    }

    #[cfg(feature = "http-server")]
    #[tokio::test]
    async fn test_run_until_shutdown() {
        let mut app = RivetApp::from_config(config("127.0.0.1:0"));
        app.get("/ping", ping);
        app.run_until(async {}).await.unwrap();
    }

    #[cfg(feature = "http-server")]
    #[tokio::test]
    async fn test_invalid_addr_is_config_error() {
        let app = RivetApp::from_config(config("not an address"));
        let err = app.run_until(async {}).await.unwrap_err();
        assert!(matches!(err, crate::RuntimeError::Config(_)));
    }
}
