use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize `value` as a JSON response with the given status.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

/// Build an `{"error": ...}` response. Infallible so it can be returned
/// from `Result<_, Response<Body>>` guards.
pub fn error(status: StatusCode, message: &str) -> Response<Body> {
    let body = serde_json::json!({ "error": message }).to_string();
    match Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.into())
    {
        Ok(resp) => resp,
        Err(_) => {
            let mut resp = Response::new(Body::Empty);
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        }
    }
}

/// Parse a JSON request body, turning failures into a 400 response.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response<Body>> {
    serde_json::from_slice(body).map_err(|e| {
        error(
            StatusCode::BAD_REQUEST,
            &format!("Invalid request body: {}", e),
        )
    })
}

/// File-download response with a Content-Disposition attachment header.
pub fn attachment(
    content_type: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename={}", filename),
        )
        .body(Body::from(bytes))
        .map_err(Box::new)?)
}
