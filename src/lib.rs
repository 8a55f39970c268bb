//! # ghost-router
//!
//! **ghost-router** builds HTTP routes out of five pluggable stages and runs
//! them as a fixed pipeline on the `may` coroutine runtime.
//!
//! ## Overview
//!
//! Each route is assembled from:
//!
//! - zero or more [`Extender`]s that fill in a typed, request-scoped context
//! - a [`RequestModel`] that parses the request into a typed model value
//! - a [`Validator`] that checks the model
//! - a [`Processor`] that computes the route's output
//! - a [`Writer`] that serializes the output into the response body
//!
//! Any stage after the extenders may fail with an [`HttpError`]; the error's
//! message and status code are written to the client and no further stage
//! runs. Stages a route does not need stay at their null implementation.
//!
//! ## Architecture
//!
//! - **[`router`]** - Routing table, route builder and the pipeline it runs
//! - **[`pipeline`]** - The five stage traits
//! - **[`null`]** - No-op stages every route starts with
//! - **[`stages`]** - JSON model and writer
//! - **[`server`]** - `may_minihttp` adapter and server lifecycle
//! - **[`config`]** / **[`logging`]** - Environment configuration and tracing setup
//! - **[`sample`]** - The user-lookup service served by the binary
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as RouterService<br/>(may_minihttp)
//!     participant Router
//!     participant Pipeline
//!
//!     Client->>Server: GET /user/id/1
//!     Server->>Server: parse_request
//!     Server->>Router: dispatch
//!     alt No route / wrong method
//!         Router-->>Client: 404 / 405
//!     end
//!     Router->>Pipeline: extend → model → validate → process → serialize
//!     alt Stage fails
//!         Pipeline-->>Client: error status + message
//!     end
//!     Pipeline-->>Client: 200 + writer bytes
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use ghost_router::sample::build_router;
//! use ghost_router::server::HttpServer;
//!
//! let router = build_router("s3cr3tstr!ng").expect("routes are valid");
//! let handle = HttpServer(router.into_service())
//!     .start("0.0.0.0:8080")
//!     .expect("bind failed");
//! handle.join().ok();
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod logging;
pub mod null;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod router;
pub mod sample;
pub mod server;
pub mod stages;

pub use context::Require;
pub use error::{HttpError, RouteError};
pub use null::{NullModel, NullProcessor, NullValidator, NullWriter};
pub use pipeline::{Extender, Processor, RequestModel, Validator, Writer};
pub use request::Request;
pub use response::{ContentType, PipelineResponse};
pub use router::{RouteBuilder, RouteInfo, Router};
