//! # Router Module
//!
//! The router owns the routing table and the routes registered on it.
//!
//! - [`Router::add_route`] starts a [`RouteBuilder`] for a path pattern such
//!   as `/user/id/{id}`, with every stage set to its null implementation
//! - [`RouteBuilder::register`] validates the pattern and stores the route
//! - [`Router::dispatch`] matches a request by path and method and runs the
//!   route's pipeline
//!
//! ## Path patterns
//!
//! Patterns are `/`-separated. A `{name}` segment captures one non-empty path
//! segment, available to models through [`Request::path_param`](crate::Request::path_param).
//! Empty segments are ignored, so `/users/` and `/users` are the same route.
//! Static segments take precedence over variables at the same position.
//!
//! ## Example
//!
//! ```rust
//! use ghost_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route("/health").methods([Method::GET]).register().unwrap();
//!
//! assert_eq!(router.routes().len(), 1);
//! ```

mod builder;
mod core;
mod radix;

pub use builder::RouteBuilder;
pub use core::{RouteInfo, Router, METHOD_NOT_ALLOWED_BODY, NOT_FOUND_BODY};
