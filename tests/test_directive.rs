use bastion::config::directive::{classify, DirectiveKind};
use bastion::http::request::Method;

#[test]
fn test_listen_single_port() {
    let directive = classify("listen", "8080", false, 1).unwrap();
    assert_eq!(directive.kind, DirectiveKind::Listen(vec![8080]));
}

#[test]
fn test_listen_multiple_ports_in_order() {
    let directive = classify("listen", "8080 8081", false, 1).unwrap();
    assert_eq!(directive.kind, DirectiveKind::Listen(vec![8080, 8081]));
}

#[test]
fn test_listen_port_range_bounds() {
    assert!(classify("listen", "1", false, 1).is_ok());
    assert!(classify("listen", "65535", false, 1).is_ok());
    assert!(classify("listen", "0", false, 1).is_err());
    assert!(classify("listen", "65536", false, 1).is_err());
}

#[test]
fn test_listen_out_of_range_port_is_fatal() {
    let err = classify("listen", "99999", false, 4).unwrap_err();
    assert_eq!(err.line, 4);
}

#[test]
fn test_listen_one_bad_port_poisons_the_directive() {
    assert!(classify("listen", "8080 99999", false, 1).is_err());
}

#[test]
fn test_listen_non_numeric_port() {
    assert!(classify("listen", "eighty", false, 1).is_err());
}

#[test]
fn test_listen_without_value() {
    assert!(classify("listen", "", false, 1).is_err());
}

#[test]
fn test_server_name_keeps_order() {
    let directive = classify("server_name", "example.com www.example.com", false, 1).unwrap();
    assert_eq!(
        directive.kind,
        DirectiveKind::ServerName(vec![
            "example.com".to_string(),
            "www.example.com".to_string()
        ])
    );
}

#[test]
fn test_index_keeps_order() {
    let directive = classify("index", "index.html index.htm", true, 1).unwrap();
    assert_eq!(
        directive.kind,
        DirectiveKind::Index(vec!["index.html".to_string(), "index.htm".to_string()])
    );
}

#[test]
fn test_methods_from_allowed_set() {
    let directive = classify("methods", "GET POST DELETE PUT", true, 1).unwrap();
    assert_eq!(
        directive.kind,
        DirectiveKind::Methods(vec![
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PUT
        ])
    );
}

#[test]
fn test_methods_rejects_unknown_verb() {
    let err = classify("methods", "GET PATCH", true, 7).unwrap_err();
    assert_eq!(err.line, 7);
}

#[test]
fn test_methods_are_case_sensitive() {
    assert!(classify("methods", "get", true, 1).is_err());
}

#[test]
fn test_root_takes_exactly_one_path() {
    let directive = classify("root", "/var/www/html", true, 1).unwrap();
    assert_eq!(directive.kind, DirectiveKind::Root("/var/www/html".to_string()));
    assert!(classify("root", "/a /b", true, 1).is_err());
    assert!(classify("root", "", true, 1).is_err());
}

#[test]
fn test_cgi_fileending_must_start_with_dot() {
    let directive = classify("cgi_fileending", ".php", true, 1).unwrap();
    assert_eq!(directive.kind, DirectiveKind::CgiFileEnding(".php".to_string()));
    assert!(classify("cgi_fileending", "php", true, 1).is_err());
    assert!(classify("cgi_fileending", ".", true, 1).is_err());
}

#[test]
fn test_post_max_size_round_trips() {
    let directive = classify("post_max_size", "10", true, 1).unwrap();
    assert_eq!(directive.kind, DirectiveKind::PostMaxSize(10));
}

#[test]
fn test_post_max_size_must_be_all_digits() {
    assert!(classify("post_max_size", "10MB", true, 1).is_err());
    assert!(classify("post_max_size", "-5", true, 1).is_err());
    assert!(classify("post_max_size", "", true, 1).is_err());
}

#[test]
fn test_directory_listing_on_off_only() {
    let on = classify("directory_listing", "on", true, 1).unwrap();
    assert_eq!(on.kind, DirectiveKind::DirectoryListing(true));
    let off = classify("directory_listing", "off", true, 1).unwrap();
    assert_eq!(off.kind, DirectiveKind::DirectoryListing(false));
    assert!(classify("directory_listing", "yes", true, 1).is_err());
}

#[test]
fn test_redirection_requires_target() {
    assert!(classify("redirection", "/new/", true, 1).is_ok());
    assert!(classify("redirection", "http://example.com/", true, 1).is_ok());
    assert!(classify("redirection", "", true, 1).is_err());
    assert!(classify("redirection", "   ", true, 1).is_err());
}

#[test]
fn test_redirection_rejects_broken_absolute_url() {
    assert!(classify("redirection", "http://", true, 1).is_err());
}

#[test]
fn test_error_pages_take_one_path() {
    assert!(classify("not_found_error_page", "/errors/404.html", true, 1).is_ok());
    assert!(classify("general_error_page", "/errors/500.html", true, 1).is_ok());
    assert!(classify("not_available_page", "/errors/403.html", true, 1).is_ok());
    assert!(classify("not_found_error_page", "", true, 1).is_err());
}

#[test]
fn test_server_directives_rejected_inside_location() {
    assert!(classify("listen", "8080", true, 3).is_err());
    assert!(classify("server_name", "example.com", true, 3).is_err());
    assert!(classify("location", "/nested/", true, 3).is_err());
}

#[test]
fn test_location_directives_rejected_at_server_level() {
    assert!(classify("root", "/var/www", false, 3).is_err());
    assert!(classify("methods", "GET", false, 3).is_err());
    assert!(classify("directory_listing", "on", false, 3).is_err());
}

#[test]
fn test_unknown_directive_is_fatal() {
    let err = classify("worker_processes", "4", false, 12).unwrap_err();
    assert_eq!(err.line, 12);
}

#[test]
fn test_directive_keeps_raw_key_and_value() {
    let directive = classify("listen", "8080", false, 2).unwrap();
    assert_eq!(directive.key, "listen");
    assert_eq!(directive.value, "8080");
    assert_eq!(directive.line, 2);
}
