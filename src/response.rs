//! What a dispatched request produces, before it reaches the socket.

use crate::error::HttpError;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// A Content-Type value together with its pre-rendered header line.
///
/// `may_minihttp` only accepts `&'static str` header lines, so every content
/// type a writer declares is rendered once, when its route is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType {
    value: &'static str,
    header: &'static str,
}

impl ContentType {
    pub const TEXT_PLAIN: ContentType = ContentType {
        value: "text/plain; charset=utf-8",
        header: "Content-Type: text/plain; charset=utf-8",
    };

    pub const JSON: ContentType = ContentType {
        value: "application/json",
        header: "Content-Type: application/json",
    };

    /// Look up or render the header line for `value`.
    ///
    /// Unknown values are rendered once per distinct value for the life of
    /// the process; call this at startup, not per request.
    #[must_use]
    pub fn intern(value: &'static str) -> Self {
        match value {
            "application/json" => Self::JSON,
            "text/plain; charset=utf-8" => Self::TEXT_PLAIN,
            _ => {
                static RENDERED: OnceLock<Mutex<HashMap<&'static str, &'static str>>> =
                    OnceLock::new();
                let mut rendered = RENDERED
                    .get_or_init(Default::default)
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                let header = *rendered.entry(value).or_insert_with(|| {
                    let line: &'static str =
                        Box::leak(format!("Content-Type: {value}").into_boxed_str());
                    line
                });
                Self { value, header }
            }
        }
    }

    #[must_use]
    pub fn value(&self) -> &'static str {
        self.value
    }

    #[must_use]
    pub fn header_line(&self) -> &'static str {
        self.header
    }
}

/// Status, optional content type and body of a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResponse {
    pub status: u16,
    pub content_type: Option<ContentType>,
    pub body: Vec<u8>,
}

impl PipelineResponse {
    /// 200 with the writer's bytes, verbatim.
    #[must_use]
    pub fn ok(body: Vec<u8>, content_type: Option<ContentType>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    /// Plain-text response whose body is exactly `message`.
    ///
    /// Codes outside `100..=999` cannot go on the wire and become 500.
    #[must_use]
    pub fn text(status: u16, message: &str) -> Self {
        let status = if (100..=999).contains(&status) {
            status
        } else {
            500
        };
        Self {
            status,
            content_type: Some(ContentType::TEXT_PLAIN),
            body: message.as_bytes().to_vec(),
        }
    }

    #[must_use]
    pub fn from_error(err: &HttpError) -> Self {
        Self::text(err.status_code(), err.message())
    }

    /// Body as UTF-8 (lossy), for logging and assertions.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
