use super::request::parse_request;
use super::response::write_response;
use crate::response::PipelineResponse;
use crate::router::Router;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span};

/// Body of the response sent when a stage panics.
pub const PANIC_BODY: &str = "Internal Server Error";

/// `may_minihttp` service that feeds every request through a [`Router`].
///
/// The router is shared read-only between connections.
pub struct RouterService<C = ()> {
    router: Arc<Router<C>>,
}

impl<C> Clone for RouterService<C> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
        }
    }
}

impl<C> RouterService<C> {
    pub fn new(router: Arc<Router<C>>) -> Self {
        Self { router }
    }
}

impl<C> Router<C> {
    /// Freeze the router and wrap it as the server's HTTP service.
    #[must_use]
    pub fn into_service(self) -> RouterService<C> {
        self.log_routes();
        RouterService::new(Arc::new(self))
    }
}

impl<C: Default> RouterService<C> {
    fn respond(&self, req: crate::Request<()>) -> PipelineResponse {
        let span = info_span!(
            "request",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path
        );
        let _entered = span.enter();
        let started = Instant::now();
        let request_id = req.request_id;

        let response = match catch_unwind(AssertUnwindSafe(|| self.router.dispatch(req))) {
            Ok(response) => response,
            Err(panic) => {
                let details = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                error!(request_id = %request_id, details = %details, "Pipeline stage panicked");
                PipelineResponse::text(500, PANIC_BODY)
            }
        };

        info!(
            status = response.status,
            body_size_bytes = response.body.len(),
            latency_us = started.elapsed().as_micros() as u64,
            "Request completed"
        );
        response
    }
}

impl<C: Default> HttpService for RouterService<C> {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let response = match parse_request(req) {
            Ok(req) => self.respond(req),
            Err(err) => PipelineResponse::from_error(&err),
        };
        write_response(res, response);
        Ok(())
    }
}
