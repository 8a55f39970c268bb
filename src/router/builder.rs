//! Route builder and the five-stage pipeline it assembles.

use super::core::{RouteEntry, Router};
use super::radix::parse_pattern;
use crate::error::{HttpError, RouteError};
use crate::null::{NullModel, NullProcessor, NullValidator, NullWriter};
use crate::pipeline::{Extender, Processor, RequestModel, Validator, Writer};
use crate::request::Request;
use crate::response::{ContentType, PipelineResponse};
use http::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Type-erased pipeline stored in the routing table.
pub(crate) trait Route<C>: Send + Sync {
    fn handle(&self, req: Request<C>) -> PipelineResponse;
}

/// The fixed stage sequence of one route.
pub(crate) struct Pipeline<C, Mo, V, P, W> {
    pattern: Arc<str>,
    extenders: Vec<Box<dyn Extender<C>>>,
    model: Mo,
    validator: V,
    processor: P,
    writer: W,
    content_type: Option<ContentType>,
}

impl<C, Mo, V, P, W> Pipeline<C, Mo, V, P, W>
where
    Mo: RequestModel<C>,
    V: Validator<Mo::Model>,
    P: Processor<Mo::Model>,
    W: Writer<P::Output>,
{
    fn run(&self, mut req: Request<C>) -> Result<Vec<u8>, (&'static str, HttpError)> {
        for extender in &self.extenders {
            extender.extend(&mut req);
        }
        let model = self.model.from_request(&req).map_err(|e| ("model", e))?;
        self.validator.validate(&model).map_err(|e| ("validate", e))?;
        let output = self.processor.process(model).map_err(|e| ("process", e))?;
        self.writer.serialize(&output).map_err(|e| ("serialize", e))
    }
}

impl<C, Mo, V, P, W> Route<C> for Pipeline<C, Mo, V, P, W>
where
    C: Send,
    Mo: RequestModel<C>,
    V: Validator<Mo::Model>,
    P: Processor<Mo::Model>,
    W: Writer<P::Output>,
{
    fn handle(&self, req: Request<C>) -> PipelineResponse {
        match self.run(req) {
            Ok(body) => PipelineResponse::ok(body, self.content_type),
            Err((stage, err)) => {
                if err.is_client_error() {
                    debug!(
                        route = %self.pattern,
                        stage,
                        status = err.status_code(),
                        error = %err,
                        "Pipeline stage rejected request"
                    );
                } else {
                    warn!(
                        route = %self.pattern,
                        stage,
                        status = err.status_code(),
                        error = %err,
                        "Pipeline stage failed"
                    );
                }
                PipelineResponse::from_error(&err)
            }
        }
    }
}

/// Fluent builder for one route, returned by [`Router::add_route`].
///
/// Every stage starts as its null implementation. Replacing a stage changes
/// the builder's type, so a validator or processor that does not accept the
/// model is a compile error at [`register`](RouteBuilder::register).
///
/// ```
/// use ghost_router::stages::JsonWriter;
/// use ghost_router::{HttpError, Processor, Request, RequestModel, Router};
/// use http::Method;
///
/// struct Name;
/// impl RequestModel<()> for Name {
///     type Model = String;
///     fn from_request(&self, req: &Request) -> Result<String, HttpError> {
///         Ok(req.require_path_param("name")?.to_string())
///     }
/// }
///
/// struct Greet;
/// impl Processor<String> for Greet {
///     type Output = String;
///     fn process(&self, name: String) -> Result<String, HttpError> {
///         Ok(format!("hello {name}"))
///     }
/// }
///
/// let mut router = Router::new();
/// router
///     .add_route("/hello/{name}")
///     .methods([Method::GET])
///     .model(Name)
///     .processor(Greet)
///     .writer(JsonWriter)
///     .register()
///     .unwrap();
///
/// let res = router.dispatch(Request::new(Method::GET, "/hello/joe"));
/// assert_eq!(res.status, 200);
/// assert_eq!(res.body, br#""hello joe""#.to_vec());
/// ```
#[must_use = "call `.register()` to add the route to the router"]
pub struct RouteBuilder<
    'r,
    C,
    Mo = NullModel,
    V = NullValidator,
    P = NullProcessor,
    W = NullWriter,
> {
    router: &'r mut Router<C>,
    pattern: String,
    methods: Vec<Method>,
    extenders: Vec<Box<dyn Extender<C>>>,
    model: Mo,
    validator: V,
    processor: P,
    writer: W,
}

impl<'r, C> RouteBuilder<'r, C> {
    pub(crate) fn new(router: &'r mut Router<C>, pattern: &str) -> Self {
        Self {
            router,
            pattern: pattern.to_string(),
            methods: Vec::new(),
            extenders: Vec::new(),
            model: NullModel,
            validator: NullValidator,
            processor: NullProcessor,
            writer: NullWriter,
        }
    }
}

impl<'r, C, Mo, V, P, W> RouteBuilder<'r, C, Mo, V, P, W> {
    /// Restrict the route to these HTTP methods. Calls accumulate; a route
    /// with no methods accepts any method.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        for method in methods {
            if !self.methods.contains(&method) {
                self.methods.push(method);
            }
        }
        self
    }

    /// Append an extender. Extenders run in the order they are added.
    pub fn extender(mut self, extender: impl Extender<C> + 'static) -> Self {
        self.extenders.push(Box::new(extender));
        self
    }

    /// Set the model that turns the request into a typed value.
    pub fn model<M2>(self, model: M2) -> RouteBuilder<'r, C, M2, V, P, W> {
        RouteBuilder {
            router: self.router,
            pattern: self.pattern,
            methods: self.methods,
            extenders: self.extenders,
            model,
            validator: self.validator,
            processor: self.processor,
            writer: self.writer,
        }
    }

    /// Set the validator that checks the model before processing.
    pub fn validator<V2>(self, validator: V2) -> RouteBuilder<'r, C, Mo, V2, P, W> {
        RouteBuilder {
            router: self.router,
            pattern: self.pattern,
            methods: self.methods,
            extenders: self.extenders,
            model: self.model,
            validator,
            processor: self.processor,
            writer: self.writer,
        }
    }

    /// Set the processor that computes the route's output.
    pub fn processor<P2>(self, processor: P2) -> RouteBuilder<'r, C, Mo, V, P2, W> {
        RouteBuilder {
            router: self.router,
            pattern: self.pattern,
            methods: self.methods,
            extenders: self.extenders,
            model: self.model,
            validator: self.validator,
            processor,
            writer: self.writer,
        }
    }

    /// Set the writer that serializes the output.
    pub fn writer<W2>(self, writer: W2) -> RouteBuilder<'r, C, Mo, V, P, W2> {
        RouteBuilder {
            router: self.router,
            pattern: self.pattern,
            methods: self.methods,
            extenders: self.extenders,
            model: self.model,
            validator: self.validator,
            processor: self.processor,
            writer,
        }
    }
}

impl<'r, C, Mo, V, P, W> RouteBuilder<'r, C, Mo, V, P, W>
where
    C: Send + 'static,
    Mo: RequestModel<C> + 'static,
    V: Validator<Mo::Model> + 'static,
    P: Processor<Mo::Model> + 'static,
    W: Writer<P::Output> + 'static,
{
    /// Add the route to the router.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] for a malformed pattern and
    /// [`RouteError::DuplicateRoute`] when the pattern/method pair is taken.
    pub fn register(self) -> Result<(), RouteError> {
        let segments = parse_pattern(&self.pattern)?;
        let pattern: Arc<str> = Arc::from(self.pattern.as_str());
        let extender_count = self.extenders.len();
        let content_type = self.writer.content_type().map(ContentType::intern);
        let pipeline = Pipeline {
            pattern: Arc::clone(&pattern),
            extenders: self.extenders,
            model: self.model,
            validator: self.validator,
            processor: self.processor,
            writer: self.writer,
            content_type,
        };
        let entry = RouteEntry {
            pattern,
            methods: self.methods,
            handler: Arc::new(pipeline),
        };
        let methods = entry.methods.clone();
        self.router.insert(&segments, entry)?;

        info!(
            pattern = %self.pattern,
            methods = ?methods,
            extenders = extender_count,
            "Route registered"
        );
        Ok(())
    }
}
