//! The per-request view handed to pipeline stages.

use crate::error::HttpError;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use http::Method;
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 variables (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path variables in pattern order. Names come from the routing table and are
/// shared, values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// An incoming request as seen by extenders and models.
///
/// `C` is the request-scoped context that extenders fill in before the model
/// runs. It starts as `C::default()` for every request.
#[derive(Debug, Clone)]
pub struct Request<C = ()> {
    pub request_id: RequestId,
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Variables captured by the matched route pattern
    pub path_params: ParamVec,
    pub query_params: HashMap<String, String>,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    /// Raw request body
    pub body: Vec<u8>,
    pub context: C,
}

impl Request<()> {
    /// Build a request from a method and a request target (`/path?query`).
    ///
    /// Used by the server adapter and handy in tests:
    ///
    /// ```
    /// use ghost_router::Request;
    /// use http::Method;
    ///
    /// let req = Request::new(Method::GET, "/users?limit=10");
    /// assert_eq!(req.path, "/users");
    /// assert_eq!(req.query_param("limit"), Some("10"));
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or("/");
        let path = if path.is_empty() { "/" } else { path };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            path_params: ParamVec::new(),
            query_params: parse_query_params(target),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
            context: (),
        }
    }
}

impl<C> Request<C> {
    /// Add a header. Names are lowercased; `cookie` and `x-request-id` are
    /// interpreted the same way the server does.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == REQUEST_ID_HEADER {
            self.request_id = RequestId::from_header_or_new(Some(value));
        }
        self.headers.insert(name, value.to_string());
        self.cookies = parse_cookies(&self.headers);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Swap the context, keeping everything else.
    pub fn with_context<D>(self, context: D) -> Request<D> {
        Request {
            request_id: self.request_id,
            method: self.method,
            path: self.path,
            path_params: self.path_params,
            query_params: self.query_params,
            headers: self.headers,
            cookies: self.cookies,
            body: self.body,
            context,
        }
    }

    /// Get a path variable by name.
    ///
    /// Uses "last write wins" semantics if a name appears more than once.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Header lookup; `name` is matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Path variable that must be present, or a 400.
    pub fn require_path_param(&self, name: &str) -> Result<&str, HttpError> {
        self.path_param(name)
            .ok_or_else(|| HttpError::bad_request(format!("missing path parameter: {name}")))
    }

    /// The body as UTF-8, or a 400.
    pub fn body_str(&self) -> Result<&str, HttpError> {
        std::str::from_utf8(&self.body).map_err(|e| HttpError::from_source(e, 400))
    }

    /// Deserialize the body as JSON, or a 400 with the decoder's message.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::from_source(e, 400))
    }
}

/// Parse the `cookie` header into name/value pairs.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let value = parts.next().unwrap_or("").trim();
                    Some((name.to_string(), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the query string of a request target.
///
/// Everything after the first `?` is form-url-decoded. Repeated names keep
/// the last value.
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    match target.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}
