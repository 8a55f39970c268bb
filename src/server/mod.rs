//! HTTP transport: `may_minihttp` adapter and server lifecycle.
//!
//! ```no_run
//! use ghost_router::server::HttpServer;
//! use ghost_router::Router;
//!
//! let router = Router::new();
//! let handle = HttpServer(router.into_service()).start("127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.join().ok();
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::parse_request;
pub use response::write_response;
pub use service::RouterService;
