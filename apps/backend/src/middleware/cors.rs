use actix_cors::Cors;
use actix_web::http::header;

/// CORS for browser clients.
///
/// With no configured origins any origin may call the API; otherwise only
/// the listed `http(s)://` origins.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let allowed: Vec<&str> = origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_MATCH,
            header::IF_NONE_MATCH,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::ETAG,
        ])
        .max_age(3600);

    if allowed.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
