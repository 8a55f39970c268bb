use crate::error::HttpError;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::request::{parse_cookies, Request};
use http::Method;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Convert a `may_minihttp::Request` into the pipeline's [`Request`].
///
/// Header names are lowercased, cookies and the query string are parsed, and
/// the body is read in full as raw bytes.
///
/// # Errors
///
/// 400 when the method token is not a valid HTTP method or the body cannot be
/// read.
pub fn parse_request(req: may_minihttp::Request) -> Result<Request<()>, HttpError> {
    let method: Method = req
        .method()
        .parse()
        .map_err(|_| HttpError::bad_request("400 bad request: invalid method"))?;
    let mut parsed = Request::new(method, req.path());

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();
    debug!(
        header_count = headers.len(),
        header_names = ?headers.keys().take(20).collect::<Vec<_>>(),
        "Headers extracted"
    );

    parsed.request_id =
        RequestId::from_header_or_new(headers.get(REQUEST_ID_HEADER).map(String::as_str));
    parsed.cookies = parse_cookies(&headers);
    parsed.headers = headers;

    let mut body = Vec::new();
    req.body()
        .read_to_end(&mut body)
        .map_err(|e| HttpError::bad_request(format!("400 bad request: {e}")))?;
    parsed.body = body;

    info!(
        request_id = %parsed.request_id,
        method = %parsed.method,
        path = %parsed.path,
        query_count = parsed.query_params.len(),
        body_size_bytes = parsed.body.len(),
        "HTTP request parsed"
    );
    Ok(parsed)
}
