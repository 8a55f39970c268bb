//! The five pipeline roles.
//!
//! A route runs its stages in a fixed order:
//!
//! 1. every [`Extender`], in registration order, fills in the request context
//! 2. the [`RequestModel`] builds a model value from the request
//! 3. the [`Validator`] checks the model
//! 4. the [`Processor`] turns the model into an output
//! 5. the [`Writer`] serializes the output into the response body
//!
//! Stages 2 to 5 return [`HttpError`] on failure, which ends the request.
//! Stage objects are shared by every request on the route, so they are
//! `Send + Sync` and take `&self`; per-request state lives in the model value.

use crate::error::HttpError;
use crate::request::Request;

/// Adds values to the request-scoped context before the model runs.
///
/// Extenders see everything earlier extenders wrote. A typical extender hands
/// out a shared resource such as a database pool or a secret:
///
/// ```
/// use ghost_router::{Extender, Request};
///
/// #[derive(Default)]
/// struct Ctx {
///     secret: Option<String>,
/// }
///
/// struct SecretExtender(String);
///
/// impl Extender<Ctx> for SecretExtender {
///     fn extend(&self, req: &mut Request<Ctx>) {
///         req.context.secret = Some(self.0.clone());
///     }
/// }
/// ```
pub trait Extender<C>: Send + Sync {
    /// Merge this extender's values into `req.context`.
    fn extend(&self, req: &mut Request<C>);
}

/// Builds the typed model value for one request.
///
/// A fresh model is produced for every request; nothing is shared between
/// requests. Malformed input should be reported as a 4xx.
pub trait RequestModel<C>: Send + Sync {
    type Model;

    /// Fill the model from path parameters, query, headers, body and context.
    fn from_request(&self, req: &Request<C>) -> Result<Self::Model, HttpError>;
}

/// Checks a model against domain constraints.
pub trait Validator<M>: Send + Sync {
    /// Return an error if something is wrong with the model.
    fn validate(&self, model: &M) -> Result<(), HttpError>;
}

/// Computes the route's result from a validated model.
pub trait Processor<M>: Send + Sync {
    type Output;

    /// Process the model or return an error with whatever status fits
    /// (404 for a missing record, 500 for an internal failure).
    fn process(&self, model: M) -> Result<Self::Output, HttpError>;
}

/// Serializes a processor's output into the response body.
pub trait Writer<O>: Send + Sync {
    /// Encode the output. Encoding failures should be reported as a 5xx.
    fn serialize(&self, output: &O) -> Result<Vec<u8>, HttpError>;

    /// Content type of the bytes produced by [`serialize`](Writer::serialize).
    ///
    /// `None` writes no Content-Type header.
    fn content_type(&self) -> Option<&'static str> {
        None
    }
}

impl<C, F> Extender<C> for F
where
    F: Fn(&mut Request<C>) + Send + Sync,
{
    fn extend(&self, req: &mut Request<C>) {
        self(req)
    }
}
