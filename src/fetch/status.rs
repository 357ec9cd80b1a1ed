use reqwest::StatusCode;

/// User-facing explanation for a non-success HTTP status
///
/// # Examples
///
/// ```
/// use webpage_analyzer::fetch::status_message;
///
/// assert!(status_message(404).starts_with("Page not found"));
/// assert_eq!(status_message(418), "HTTP 418: I'm a teapot");
/// ```
pub fn status_message(code: u16) -> String {
    let message = match code {
        400 => "Bad request: The server could not understand the request.",
        401 => "Unauthorized: The page requires authentication.",
        403 => "Forbidden: Access to this page is denied.",
        404 => "Page not found: The requested page does not exist on the server.",
        405 => "Method not allowed: The server does not allow this page to be retrieved.",
        408 => "Request timeout: The server timed out waiting for the request.",
        410 => "Gone: The page has been permanently removed.",
        429 => "Too many requests: The server is rate limiting requests. Please try again later.",
        500 => "Internal server error: The server encountered an unexpected condition.",
        502 => "Bad gateway: The server received an invalid response from upstream.",
        503 => "Service unavailable: The server is temporarily unable to handle the request.",
        504 => "Gateway timeout: The upstream server did not respond in time.",
        _ => {
            let reason = StatusCode::from_u16(code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown Status");
            return format!("HTTP {}: {}", code, reason);
        }
    };
    message.to_string()
}
