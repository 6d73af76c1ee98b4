use bastion::config::{build, DirectiveKind};
use bastion::http::request::Method;

const SAMPLE: &str = "\
# bastion test configuration
server {
    listen 8080 8081
    server_name example.com www.example.com
    location / {
        root /var/www/html
        index index.html index.htm
        methods GET POST
    }
    location /uploads/ {
        root /var/www/uploads
        methods POST DELETE
        post_max_size 10
        directory_listing on
    }
}
server {
    listen 9090
    server_name other.test
    location / {
        root /srv/other # static content only
        redirection /new/
    }
}
";

#[test]
fn test_build_one_block_per_server_marker() {
    let servers = build(SAMPLE).unwrap();
    assert_eq!(servers.len(), 2);
}

#[test]
fn test_build_ports_and_names_in_order() {
    let servers = build(SAMPLE).unwrap();
    assert_eq!(servers[0].ports, vec![8080, 8081]);
    assert_eq!(
        servers[0].server_names,
        vec!["example.com".to_string(), "www.example.com".to_string()]
    );
    assert_eq!(servers[1].ports, vec![9090]);
}

#[test]
fn test_build_locations_in_source_order() {
    let servers = build(SAMPLE).unwrap();
    let locations = &servers[0].locations;
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].path, "/");
    assert_eq!(locations[1].path, "/uploads/");
}

#[test]
fn test_location_prefix_gets_trailing_slash() {
    let text = "server {\nlisten 8080\nlocation /api {\nroot /srv/api\n}\n}\n";
    let servers = build(text).unwrap();
    assert_eq!(servers[0].locations[0].path, "/api/");
}

#[test]
fn test_location_accessors() {
    let servers = build(SAMPLE).unwrap();
    let uploads = &servers[0].locations[1];

    assert_eq!(uploads.root(), Some("/var/www/uploads"));
    assert!(uploads.allows_method(Method::POST));
    assert!(uploads.allows_method(Method::DELETE));
    assert!(!uploads.allows_method(Method::GET));
    assert_eq!(uploads.post_max_size(), Some(10));
    assert!(uploads.directory_listing());
    assert_eq!(uploads.indexes(), None);
}

#[test]
fn test_location_without_methods_allows_all() {
    let servers = build(SAMPLE).unwrap();
    let other = &servers[1].locations[0];
    assert!(other.allows_method(Method::GET));
    assert!(other.allows_method(Method::DELETE));
}

#[test]
fn test_inline_comment_is_stripped() {
    let servers = build(SAMPLE).unwrap();
    assert_eq!(servers[1].locations[0].root(), Some("/srv/other"));
}

#[test]
fn test_full_line_comment_is_dropped() {
    let text = "# only a comment\nserver {\nlisten 8080\n}\n";
    let servers = build(text).unwrap();
    assert_eq!(servers.len(), 1);
}

#[test]
fn test_directives_survive_as_classified_entries() {
    let servers = build(SAMPLE).unwrap();
    let root = &servers[0].locations[0];
    assert!(matches!(root.directives[0].kind, DirectiveKind::Root(_)));
    assert_eq!(
        root.indexes(),
        Some(&["index.html".to_string(), "index.htm".to_string()][..])
    );
}

#[test]
fn test_cgi_and_error_page_accessors() {
    let text = "\
server {
    listen 8080
    location /cgi/ {
        root /var/www/cgi
        cgi_path /usr/bin/php-cgi
        cgi_fileending .php
        not_found_error_page /errors/404.html
        general_error_page /errors/500.html
        not_available_page /errors/403.html
    }
}
";
    let servers = build(text).unwrap();
    let cgi = &servers[0].locations[0];

    assert_eq!(cgi.cgi_path(), Some("/usr/bin/php-cgi"));
    assert_eq!(cgi.cgi_file_ending(), Some(".php"));
    assert_eq!(cgi.not_found_page(), Some("/errors/404.html"));
    assert_eq!(cgi.general_error_page(), Some("/errors/500.html"));
    assert_eq!(cgi.not_available_page(), Some("/errors/403.html"));
}

#[test]
fn test_redirection_accessor() {
    let servers = build(SAMPLE).unwrap();
    assert_eq!(servers[1].locations[0].redirection(), Some("/new/"));
    assert_eq!(servers[0].locations[0].redirection(), None);
}

#[test]
fn test_unclosed_server_block_is_fatal() {
    let text = "server {\nlisten 8080\n";
    assert!(build(text).is_err());
}

#[test]
fn test_unclosed_location_block_is_fatal() {
    let text = "server {\nlisten 8080\nlocation / {\nroot /srv\n}\n";
    assert!(build(text).is_err());
}

#[test]
fn test_stray_closing_brace_is_fatal() {
    let err = build("}\n").unwrap_err();
    assert_eq!(err.line, 1);
}

#[test]
fn test_directive_outside_server_block_is_fatal() {
    assert!(build("listen 8080\n").is_err());
}

#[test]
fn test_nested_server_block_is_fatal() {
    let text = "server {\nserver {\n}\n}\n";
    assert!(build(text).is_err());
}

#[test]
fn test_nested_location_block_is_fatal() {
    let text = "server {\nlocation / {\nlocation /a/ {\n}\n}\n}\n";
    assert!(build(text).is_err());
}

#[test]
fn test_location_outside_server_is_fatal() {
    let text = "location / {\n}\n";
    assert!(build(text).is_err());
}

#[test]
fn test_classification_error_keeps_line_number() {
    let text = "server {\n    listen 99999\n}\n";
    let err = build(text).unwrap_err();
    assert_eq!(err.line, 2);
}

#[test]
fn test_server_level_general_directive_is_fatal() {
    let text = "server {\nroot /var/www\n}\n";
    assert!(build(text).is_err());
}

#[test]
fn test_empty_config_builds_no_servers() {
    let servers = build("# nothing here\n\n").unwrap();
    assert!(servers.is_empty());
}
