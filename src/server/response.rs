use crate::response::PipelineResponse;
use http::StatusCode;
use may_minihttp::Response;

fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// Write a finished pipeline response to the socket response.
pub fn write_response(res: &mut Response, response: PipelineResponse) {
    res.status_code(usize::from(response.status), status_reason(response.status));
    if let Some(content_type) = response.content_type {
        res.header(content_type.header_line());
    }
    res.body_vec(response.body);
}
