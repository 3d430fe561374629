//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatcher as its only service
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Apply reloaded config routes to the rule table
//! - Stop gracefully on shutdown

use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{RouteConfig, RouterConfig};
use crate::http::dispatch::{table_from_routes, Dispatcher};
use crate::http::error::ServerError;
use crate::http::request::{RequestIdExt, UuidRequestId};

/// HTTP server in front of a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    dispatcher: Dispatcher,
}

impl HttpServer {
    /// Create a server for an existing dispatcher.
    pub fn new(config: RouterConfig, dispatcher: Dispatcher) -> Self {
        let router = Self::build_router(&config, dispatcher.clone());
        Self {
            router,
            config,
            dispatcher,
        }
    }

    /// Create a server whose table is built from `config.routes`.
    pub fn from_config(config: RouterConfig) -> Result<Self, ServerError> {
        let dispatcher = Dispatcher::from_routes(&config.routes)?;
        Ok(Self::new(config, dispatcher))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, dispatcher: Dispatcher) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new().fallback_service(dispatcher).layer(middleware)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Each route list received on `route_updates` replaces the config
    /// rules; rules registered through [`HttpServer::dispatcher`] stay. An
    /// update that cannot be applied is logged and dropped. Returns once
    /// `shutdown` fires and in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut route_updates: mpsc::UnboundedReceiver<Vec<RouteConfig>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.dispatcher.len(),
            "HTTP server starting"
        );

        let dispatcher = self.dispatcher.clone();
        let reloader = tokio::spawn(async move {
            while let Some(routes) = route_updates.recv().await {
                let applied = table_from_routes(&routes)
                    .and_then(|table| dispatcher.reload(table).map_err(ServerError::Reload));
                match applied {
                    Ok(()) => tracing::info!(rules = dispatcher.len(), "Rule table reloaded"),
                    Err(e) => tracing::error!(
                        error = %e,
                        "Rejected reloaded routes, keeping current rule table"
                    ),
                }
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        reloader.abort();
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle to the dispatcher, for registering handlers at runtime.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
