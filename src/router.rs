//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router also owns the
//! shared application state and the session layer the server wraps around
//! it, so a routed request arrives at its handler with everything it needs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::{Instrument, info, info_span};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: Arc<S>,
    sessions: SessionManagerLayer<MemoryStore>,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: Arc<S>, sessions: SessionManagerLayer<MemoryStore>) -> Self {
        Self { routes: HashMap::new(), state, sessions }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    pub(crate) fn sessions(&self) -> &SessionManagerLayer<MemoryStore> {
        &self.sessions
    }

    /// Routes one request and produces one response.
    ///
    /// `target` is the request path with an optional `?query` suffix.
    /// Unknown methods get `405`, unmatched paths `404`.
    pub async fn dispatch(&self, method: &str, target: &str, body: Vec<u8>, session: Session) -> Response {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let span = info_span!("request", method, path);
        async move {
            let start = Instant::now();
            let response = self.route(method, path, raw_query, body, session).await;
            info!(
                status = response.status_code().code(),
                latency_us = start.elapsed().as_micros() as u64,
                "handled"
            );
            response
        }
        .instrument(span)
        .await
    }

    async fn route(
        &self,
        method: &str,
        path: &str,
        raw_query: Option<&str>,
        body: Vec<u8>,
        session: Session,
    ) -> Response {
        let Ok(method) = method.parse::<Method>() else {
            return Response::status(Status::MethodNotAllowed);
        };
        let Some((handler, params)) = self.lookup(method, path) else {
            return Response::status(Status::NotFound);
        };

        let req = Request::new(raw_query, body, session).with_params(params);
        handler.call(Arc::clone(&self.state), req).await
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        // HEAD is served by the GET route; hyper drops the body.
        let method = if method == Method::Head { Method::Get } else { method };
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}
