//! Ready-made JSON stages.

use crate::error::HttpError;
use crate::pipeline::{RequestModel, Writer};
use crate::request::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Serializes any `Serialize` output with `serde_json`.
///
/// Encoding failures become a 500 carrying the encoder's message.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWriter;

impl<O: Serialize> Writer<O> for JsonWriter {
    fn serialize(&self, output: &O) -> Result<Vec<u8>, HttpError> {
        serde_json::to_vec(output).map_err(|e| HttpError::from_source(e, 500))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("application/json")
    }
}

/// Model that deserializes the JSON request body into `T`.
///
/// ```
/// use ghost_router::stages::JsonBody;
/// use ghost_router::{Request, RequestModel};
/// use http::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct NewPet {
///     name: String,
/// }
///
/// let req = Request::new(Method::POST, "/pets").with_body(r#"{"name":"Rex"}"#);
/// let pet = JsonBody::<NewPet>::new().from_request(&req).unwrap();
/// assert_eq!(pet.name, "Rex");
/// ```
pub struct JsonBody<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T> JsonBody<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<T> Default for JsonBody<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonBody<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonBody<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonBody")
    }
}

impl<C, T: DeserializeOwned> RequestModel<C> for JsonBody<T> {
    type Model = T;

    fn from_request(&self, req: &Request<C>) -> Result<T, HttpError> {
        req.json()
    }
}
