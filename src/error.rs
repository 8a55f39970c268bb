//! Error types for the request pipeline and route registration.
//!
//! [`HttpError`] is what every pipeline stage returns on failure: a message
//! for the client and the status code to answer with. [`RouteError`] is
//! returned at startup when a route cannot be registered.

use http::Method;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// A failure that terminates the current request.
///
/// The message becomes the plain-text response body and the status code the
/// response status. Construct it where the failure happens and return it from
/// the stage; the router writes it and skips every later stage.
///
/// Errors built with [`HttpError::from_source`] keep the underlying error,
/// reachable through [`Error::source`].
#[derive(Debug, Clone)]
pub struct HttpError {
    message: String,
    status: u16,
    source: Option<Arc<dyn Error + Send + Sync>>,
}

impl HttpError {
    /// Wrap any displayable error with a status code.
    ///
    /// ```
    /// use ghost_router::HttpError;
    ///
    /// let err = "abc".parse::<i64>().map_err(|e| HttpError::new(e, 400));
    /// assert_eq!(err.unwrap_err().status_code(), 400);
    /// ```
    pub fn new(err: impl fmt::Display, status: u16) -> Self {
        Self {
            message: err.to_string(),
            status,
            source: None,
        }
    }

    /// Wrap an error value, keeping it as the [`source`](Error::source).
    ///
    /// ```
    /// use ghost_router::HttpError;
    /// use std::error::Error;
    ///
    /// let parse_err = "abc".parse::<i64>().unwrap_err();
    /// let err = HttpError::from_source(parse_err.clone(), 400);
    /// assert_eq!(err.message(), parse_err.to_string());
    /// assert!(err.source().is_some());
    /// ```
    pub fn from_source<E: Error + Send + Sync + 'static>(err: E, status: u16) -> Self {
        Self {
            message: err.to_string(),
            status,
            source: Some(Arc::new(err)),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(err: impl fmt::Display) -> Self {
        Self::new(err, 400)
    }

    /// 404 Not Found
    pub fn not_found(err: impl fmt::Display) -> Self {
        Self::new(err, 404)
    }

    /// 500 Internal Server Error
    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(err, 500)
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for 4xx codes.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Equal when message and status match; sources are not compared.
impl PartialEq for HttpError {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.message == other.message
    }
}

impl Eq for HttpError {}

impl Error for HttpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

/// Route registration error
///
/// Returned by [`RouteBuilder::register`](crate::router::RouteBuilder::register)
/// when the path pattern is malformed or the route is already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The path pattern cannot be parsed.
    InvalidPattern {
        /// The pattern as given to `add_route`
        pattern: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// Another route already handles this pattern for the same method.
    ///
    /// `method` is `None` when the conflict is on a route that accepts any
    /// method.
    DuplicateRoute {
        pattern: String,
        method: Option<Method>,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{pattern}': {reason}")
            }
            RouteError::DuplicateRoute {
                pattern,
                method: Some(method),
            } => write!(f, "route {method} {pattern} is already registered"),
            RouteError::DuplicateRoute {
                pattern,
                method: None,
            } => write!(f, "route {pattern} (any method) is already registered"),
        }
    }
}

impl Error for RouteError {}
