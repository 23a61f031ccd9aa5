use crate::router::HeaderVec;
use may_minihttp::Response;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        504 => "Gateway Timeout",
        _ => "OK",
    }
}

/// Write a response body to the client, echoing any caller-supplied headers
/// (e.g. `X-Request-Id`) verbatim.
pub fn write_handler_response(res: &mut Response, status: u16, body: Value, headers: &HeaderVec) {
    let reason = status_reason(status);
    res.status_code(status as usize, reason);
    for (k, v) in headers {
        res.header(&format!("{k}: {v}"));
    }
    match body {
        Value::String(s) => {
            res.header("Content-Type: text/plain");
            res.body_vec(s.into_bytes());
        }
        Value::Null => {}
        other => {
            res.header("Content-Type: application/json");
            res.body_vec(serde_json::to_vec(&other).unwrap_or_default());
        }
    }
}

/// Write a raw upstream response body through verbatim, without re-serializing JSON.
pub fn write_raw_response(res: &mut Response, status: u16, body: &[u8], headers: &HeaderVec) {
    let reason = status_reason(status);
    res.status_code(status as usize, reason);
    for (k, v) in headers {
        res.header(&format!("{k}: {v}"));
    }
    res.body_vec(body.to_vec());
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    let reason = status_reason(status);
    res.status_code(status as usize, reason);
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
    }
}
