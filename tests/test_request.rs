use bastion::http::request::{Flagged, Method, Request};

fn request_with_headers(headers: Vec<(&str, &str)>) -> Request {
    Request {
        headers: headers
            .into_iter()
            .map(|(name, value)| {
                (
                    Flagged::supported(name.to_string()),
                    Flagged::supported(value.to_string()),
                )
            })
            .collect(),
        ..Request::default()
    }
}

#[test]
fn test_default_request_field_flags() {
    let req = Request::default();

    assert_eq!(req.method.value, Method::UNKNOWN);
    assert!(!req.method.supported);
    assert_eq!(req.protocol.value, "http");
    assert!(req.protocol.supported);
    assert_eq!(req.port.value, 80);
    assert!(req.port.supported);
    assert_eq!(req.path.value, "/");
    assert!(req.path.supported);
    assert!(!req.script.supported);
    assert!(!req.query.supported);
    assert!(!req.fragment.supported);
    assert_eq!(req.http_version.value, "HTTP/1.1");
    assert!(!req.body.supported);
    assert!(!req.has_nested_path);
}

#[test]
fn test_flagged_constructors() {
    let ok = Flagged::supported(42);
    assert_eq!(ok.value, 42);
    assert!(ok.supported);

    let not_ok = Flagged::unsupported("https".to_string());
    assert_eq!(not_ok.value, "https");
    assert!(!not_ok.supported);
}

#[test]
fn test_method_from_token() {
    assert_eq!(Method::from_token("GET"), Some(Method::GET));
    assert_eq!(Method::from_token("POST"), Some(Method::POST));
    assert_eq!(Method::from_token("DELETE"), Some(Method::DELETE));
    assert_eq!(Method::from_token("PUT"), Some(Method::PUT));
    assert_eq!(Method::from_token("HEAD"), None);
    assert_eq!(Method::from_token("get"), None); // Case-sensitive
}

#[test]
fn test_method_as_str() {
    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::UNKNOWN.as_str(), "UNKNOWN");
}

#[test]
fn test_find_header_case_insensitive() {
    let req = request_with_headers(vec![("Host", "example.com")]);

    assert_eq!(req.find_header("host"), Some("example.com"));
    assert_eq!(req.find_header("HOST"), Some("example.com"));
    assert_eq!(req.find_header("Missing"), None);
}

#[test]
fn test_find_header_last_match_wins() {
    let req = request_with_headers(vec![("Accept", "text/html"), ("accept", "text/plain")]);

    assert_eq!(req.find_header("Accept"), Some("text/plain"));
    // Both occurrences stay in the list
    assert_eq!(req.headers.len(), 2);
}

#[test]
fn test_host_name_strips_port() {
    let req = request_with_headers(vec![("Host", "example.com:8080")]);
    assert_eq!(req.host_name(), "example.com");
}

#[test]
fn test_host_name_falls_back_to_domain() {
    let mut req = Request::default();
    req.domain = Flagged::supported("fallback.test".to_string());
    assert_eq!(req.host_name(), "fallback.test");
}

#[test]
fn test_content_length_parsing() {
    let req = request_with_headers(vec![("Content-Length", "42")]);
    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_content_length_missing_or_invalid() {
    assert_eq!(Request::default().content_length(), 0);

    let req = request_with_headers(vec![("Content-Length", "not-a-number")]);
    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_keep_alive_http11_default() {
    assert!(Request::default().keep_alive());
}

#[test]
fn test_keep_alive_close() {
    let req = request_with_headers(vec![("Connection", "close")]);
    assert!(!req.keep_alive());
}

#[test]
fn test_keep_alive_case_insensitive() {
    let req = request_with_headers(vec![("Connection", "Keep-Alive")]);
    assert!(req.keep_alive());
}
