//! Request dispatch over a shared rule table.
//!
//! # Responsibilities
//! - Hold the active rule table for all in-flight requests
//! - Resolve each request and run the winning handler
//! - Map dispatch failures to 404 / 405 / 500
//!
//! # Design Decisions
//! - Readers never lock: the table sits behind an `ArcSwap`
//! - Writers are serialized and publish a fresh copy (copy-on-write),
//!   so registration and reloads may overlap with dispatch
//! - Rules are only ever added; a reload swaps config rules, never code rules
//! - A handler panic is contained and answered with 500

use std::convert::Infallible;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::{BoxFuture, FutureExt};
use tower::Service;

use crate::config::RouteConfig;
use crate::http::error::ServerError;
use crate::http::handler::{static_responder, BoxHandler};
use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::{DispatchError, RegisterError, Resolved, Rule, RuleTable};

/// Build a rule table from config-defined routes, in order.
pub fn table_from_routes(routes: &[RouteConfig]) -> Result<RuleTable<BoxHandler>, ServerError> {
    let mut table = RuleTable::new();
    for route in routes {
        let status = StatusCode::from_u16(route.status).map_err(|_| ServerError::InvalidStatus {
            route: route.name.clone(),
            status: route.status,
        })?;
        table
            .register(
                route.method.as_str(),
                &route.pattern,
                static_responder(status, route.body.clone()),
            )
            .map_err(|source| ServerError::Register {
                route: route.name.clone(),
                source,
            })?;
    }
    Ok(table)
}

/// Cloneable handle to the active rule table.
///
/// The table holds two kinds of rules: config rules, which a reload
/// replaces as a block, and code rules added through
/// [`Dispatcher::register`], which survive every reload. Config rules come
/// first, code rules follow in registration order.
#[derive(Clone, Default)]
pub struct Dispatcher {
    table: Arc<ArcSwap<RuleTable<BoxHandler>>>,
    code_rules: Arc<Mutex<Vec<Rule<BoxHandler>>>>,
}

impl Dispatcher {
    /// Create a dispatcher with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher whose config rules are `table`.
    pub fn from_table(table: RuleTable<BoxHandler>) -> Self {
        metrics::record_table_size(table.len());
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
            code_rules: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a dispatcher serving config-defined routes.
    pub fn from_routes(routes: &[RouteConfig]) -> Result<Self, ServerError> {
        Ok(Self::from_table(table_from_routes(routes)?))
    }

    /// Register a code rule. Requests already in flight keep the table they
    /// started with; later requests see the new rule, across reloads too.
    pub fn register(
        &self,
        method: &str,
        pattern: &str,
        handler: BoxHandler,
    ) -> Result<(), RegisterError> {
        let mut code_rules = self.code_rules.lock().unwrap_or_else(PoisonError::into_inner);
        let rule = Rule::new(method, pattern, handler);
        let mut next = RuleTable::clone(&self.table.load());
        next.insert(rule.clone())?;
        code_rules.push(rule);
        metrics::record_table_size(next.len());
        self.table.store(Arc::new(next));
        Ok(())
    }

    /// Replace the config rules with `config_rules`, keeping every code rule
    /// after them.
    ///
    /// Fails, leaving the active table untouched, when a code rule's pattern
    /// is now claimed by a config rule.
    pub fn reload(&self, config_rules: RuleTable<BoxHandler>) -> Result<(), RegisterError> {
        let code_rules = self.code_rules.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = config_rules;
        for rule in code_rules.iter() {
            next.insert(rule.clone())?;
        }
        metrics::record_table_size(next.len());
        self.table.store(Arc::new(next));
        Ok(())
    }

    /// The table as of now.
    pub fn snapshot(&self) -> Arc<RuleTable<BoxHandler>> {
        self.table.load_full()
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// Resolve `request` and produce its response.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().as_str().to_owned();
        let table = self.table.load_full();

        let response = match table.resolve(request.uri().path(), &method) {
            Ok(Resolved { rule, params }) => {
                let handler = rule.handler().clone();
                let call = async move { handler(request, params).await };
                match AssertUnwindSafe(call).catch_unwind().await {
                    Ok(response) => response,
                    Err(_) => {
                        tracing::error!(
                            method = %method,
                            pattern = %rule.pattern(),
                            "Handler panicked"
                        );
                        DispatchError::Internal("handler panicked".into()).into_response()
                    }
                }
            }
            Err(e) => {
                tracing::debug!(
                    request_id = %request.request_id(),
                    method = %method,
                    path = %request.uri().path(),
                    status = e.status_code().as_u16(),
                    "{}", e
                );
                e.into_response()
            }
        };

        metrics::record_dispatch(&method, response.status().as_u16(), start);
        response
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("rules", &self.len())
            .finish()
    }
}

impl Service<Request<Body>> for Dispatcher {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let dispatcher = self.clone();
        async move { Ok(dispatcher.dispatch(request).await) }.boxed()
    }
}
