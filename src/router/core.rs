//! Router facade over the routing table.

use super::builder::{Route, RouteBuilder};
use super::radix::{Lookup, RadixRouter, Segment};
use crate::error::RouteError;
use crate::request::Request;
use crate::response::PipelineResponse;
use http::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Body of the response for a path no route matches.
pub const NOT_FOUND_BODY: &str = "404 page not found";
/// Body of the response for a path whose routes reject the method.
pub const METHOD_NOT_ALLOWED_BODY: &str = "405 method not allowed";

/// A registered route as stored in the table.
pub(crate) struct RouteEntry<C> {
    pub(crate) pattern: Arc<str>,
    pub(crate) methods: Vec<Method>,
    pub(crate) handler: Arc<dyn Route<C>>,
}

impl<C> Clone for RouteEntry<C> {
    fn clone(&self) -> Self {
        Self {
            pattern: Arc::clone(&self.pattern),
            methods: self.methods.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Summary of one registered route, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub pattern: String,
    /// Empty when the route accepts any method
    pub methods: Vec<Method>,
}

/// Owns the routing table and creates routes.
///
/// `C` is the request-scoped context type shared by every route on this
/// router; use `()` when no extenders are needed. Build all routes before
/// serving: once the router is handed to the server it is read-only.
pub struct Router<C = ()> {
    table: RadixRouter<RouteEntry<C>>,
    routes: Vec<RouteInfo>,
}

impl Router<()> {
    /// Router without a request context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context()
    }
}

impl<C> Default for Router<C> {
    fn default() -> Self {
        Self {
            table: RadixRouter::default(),
            routes: Vec::new(),
        }
    }
}

impl<C> Router<C> {
    /// Router whose requests carry a `C` context, e.g.
    /// `Router::<AppContext>::with_context()`.
    #[must_use]
    pub fn with_context() -> Self {
        Self::default()
    }

    /// Begin a route for `pattern` with null stages and no extenders.
    ///
    /// Nothing is added until [`RouteBuilder::register`] is called.
    pub fn add_route(&mut self, pattern: &str) -> RouteBuilder<'_, C> {
        RouteBuilder::new(self, pattern)
    }

    /// Registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub(crate) fn insert(
        &mut self,
        segments: &[Segment],
        entry: RouteEntry<C>,
    ) -> Result<(), RouteError> {
        let info = RouteInfo {
            pattern: entry.pattern.to_string(),
            methods: entry.methods.clone(),
        };
        let methods = entry.methods.clone();
        self.table.insert(&info.pattern, segments, &methods, entry)?;
        self.routes.push(info);
        Ok(())
    }

    /// Log the routing table once, at startup.
    pub fn log_routes(&self) {
        let routes_summary: Vec<String> = self
            .routes
            .iter()
            .map(|r| {
                if r.methods.is_empty() {
                    format!("* {}", r.pattern)
                } else {
                    let methods: Vec<&str> = r.methods.iter().map(Method::as_str).collect();
                    format!("{} {}", methods.join(","), r.pattern)
                }
            })
            .collect();
        info!(
            routes_count = self.routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
    }
}

impl<C: Default> Router<C> {
    /// Match a request and run the matched route's pipeline.
    ///
    /// Unmatched paths answer 404 and paths whose routes do not accept the
    /// method answer 405, both as plain text.
    pub fn dispatch(&self, req: Request<()>) -> PipelineResponse {
        match self.table.lookup(&req.method, &req.path) {
            Lookup::Found(entry, path_params) => {
                debug!(
                    method = %req.method,
                    path = %req.path,
                    route_pattern = %entry.pattern,
                    path_params = ?path_params,
                    "Route matched"
                );
                let mut req = req.with_context(C::default());
                req.path_params = path_params;
                entry.handler.handle(req)
            }
            Lookup::MethodNotAllowed => {
                warn!(method = %req.method, path = %req.path, "Method not allowed");
                PipelineResponse::text(405, METHOD_NOT_ALLOWED_BODY)
            }
            Lookup::NotFound => {
                warn!(method = %req.method, path = %req.path, "No route matched");
                PipelineResponse::text(404, NOT_FOUND_BODY)
            }
        }
    }
}
