//! Handler type and constructors.
//!
//! A handler receives the request and the captured [`PathParams`] as an
//! explicit second argument, and owns the response entirely.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::future::{BoxFuture, FutureExt};

use crate::routing::PathParams;

/// Future returned by a [`BoxHandler`].
pub type HandlerFuture = BoxFuture<'static, Response>;

/// Type-erased, shareable request handler.
pub type BoxHandler = Arc<dyn Fn(Request<Body>, PathParams) -> HandlerFuture + Send + Sync>;

/// Box any async function of `(request, params)` into a [`BoxHandler`].
///
/// ```
/// use dispatch_router::http::handler_fn;
///
/// let handler = handler_fn(|_req, params| async move {
///     format!("hello {}", params.get("name").unwrap_or("anonymous"))
/// });
/// # drop(handler);
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> BoxHandler
where
    F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |request: Request<Body>, params: PathParams| -> HandlerFuture {
        let fut = f(request, params);
        async move { fut.await.into_response() }.boxed()
    })
}

/// Handler for config-defined routes.
///
/// Replies with `status` and either the fixed `body` or, without one, the
/// captured parameters as a JSON object.
pub fn static_responder(status: StatusCode, body: Option<String>) -> BoxHandler {
    handler_fn(move |_request, params| {
        let body = body.clone();
        async move {
            match body {
                Some(body) => (status, body).into_response(),
                None => (status, Json(params)).into_response(),
            }
        }
    })
}
