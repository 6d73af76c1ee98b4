//! Routing and response generation.
//!
//! Consumes the two read-only models the parsers produce: the server tree
//! picks where a request goes, the request's support flags decide whether
//! it is honored. All file access is plain reads under the location root;
//! CGI requests are detected but not executed.

use tokio::fs;

use crate::config::{LocationBlock, ServerBlock};
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Produces the response for one parsed request.
pub async fn respond(servers: &[ServerBlock], port: u16, req: &Request) -> Response {
    let response = route(servers, port, req).await;
    tracing::info!(
        method = req.method.value.as_str(),
        path = %req.path.value,
        status = response.status.as_u16(),
        "Request handled"
    );
    response
}

async fn route(servers: &[ServerBlock], port: u16, req: &Request) -> Response {
    let Some(server) = select_server(servers, port, req.host_name()) else {
        // Only configured ports are ever bound
        return Response::internal_error();
    };
    if !req.method.supported {
        return Response::method_not_allowed();
    }
    let Some(location) = select_location(server, &req.path.value) else {
        return Response::not_found();
    };
    if !location.allows_method(req.method.value) {
        return Response::method_not_allowed();
    }
    if let Some(target) = location.redirection() {
        return Response::redirect(target);
    }
    if req.method.value == Method::POST {
        if let Some(limit_mb) = location.post_max_size() {
            if req.body.value.len() as u64 > limit_mb * 1024 * 1024 {
                return Response::payload_too_large();
            }
        }
    }
    if is_cgi_request(location, req) {
        // Execution of CGI scripts is not part of this server.
        if let Some(interpreter) = location.cgi_path() {
            tracing::debug!("CGI execution not implemented (interpreter {})", interpreter);
        }
        return Response::not_implemented();
    }

    match req.method.value {
        Method::DELETE => delete_resource(location, req).await,
        _ => serve_static(location, req).await,
    }
}

/// A request is CGI-bound when its script was flagged supported (it lives
/// under /cgi/) or when the location routes the script's file ending to an
/// interpreter.
fn is_cgi_request(location: &LocationBlock, req: &Request) -> bool {
    if req.script.supported {
        return true;
    }
    !req.script.value.is_empty()
        && location
            .cgi_file_ending()
            .is_some_and(|ending| req.script.value.ends_with(ending))
}

/// Picks the server block for a port/host pair: the first block on the
/// port whose names include the host, else the first block on the port.
pub fn select_server<'a>(
    servers: &'a [ServerBlock],
    port: u16,
    host: &str,
) -> Option<&'a ServerBlock> {
    let candidates: Vec<&ServerBlock> =
        servers.iter().filter(|s| s.listens_on(port)).collect();
    candidates
        .iter()
        .find(|s| s.has_name(host))
        .copied()
        .or_else(|| candidates.first().copied())
}

/// Picks the location whose prefix is the longest match for the path.
///
/// Both sides are normalized with trailing slashes, so a plain prefix
/// comparison is enough.
pub fn select_location<'a>(server: &'a ServerBlock, path: &str) -> Option<&'a LocationBlock> {
    server
        .locations
        .iter()
        .filter(|loc| path.starts_with(&loc.path))
        .max_by_key(|loc| loc.path.len())
}

/// Filesystem target of a request: root + path, plus the script segment
/// for requests naming a file.
fn resource_path(root: &str, req: &Request) -> String {
    format!(
        "{}{}{}",
        root.trim_end_matches('/'),
        req.path.value,
        req.script.value
    )
}

async fn serve_static(location: &LocationBlock, req: &Request) -> Response {
    let Some(root) = location.root() else {
        return not_found(location).await;
    };

    if !req.script.value.is_empty() {
        let file = resource_path(root, req);
        return match fs::read(&file).await {
            Ok(body) => file_response(&file, body),
            Err(_) => not_found(location).await,
        };
    }

    // Directory request: index files win, in configured order.
    let dir = resource_path(root, req);
    if let Some(indexes) = location.indexes() {
        for name in indexes {
            let candidate = format!("{dir}{name}");
            if let Ok(body) = fs::read(&candidate).await {
                return file_response(&candidate, body);
            }
        }
    }
    if location.directory_listing() {
        return directory_listing(location, &dir, &req.path.value).await;
    }
    refused(location).await
}

async fn delete_resource(location: &LocationBlock, req: &Request) -> Response {
    let Some(root) = location.root() else {
        return not_found(location).await;
    };
    let target = resource_path(root, req);
    match fs::remove_file(&target).await {
        Ok(()) => Response::ok("Deleted\n"),
        Err(_) => not_found(location).await,
    }
}

fn file_response(path: &str, body: Vec<u8>) -> Response {
    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", mime::content_type(path))
        .body(body)
        .build()
}

/// Renders a minimal HTML listing of a directory.
async fn directory_listing(location: &LocationBlock, dir: &str, path: &str) -> Response {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list directory {}: {}", dir, e);
            return error_page(
                location.general_error_page(),
                StatusCode::InternalServerError,
                Response::internal_error(),
            )
            .await;
        }
    };

    let mut page = format!("<html><body><h1>Index of {path}</h1><ul>");
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        page.push_str(&format!("<li><a href=\"{path}{name}\">{name}</a></li>"));
    }
    page.push_str("</ul></body></html>");

    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .body(page.into_bytes())
        .build()
}

async fn not_found(location: &LocationBlock) -> Response {
    error_page(
        location.not_found_page(),
        StatusCode::NotFound,
        Response::not_found(),
    )
    .await
}

async fn refused(location: &LocationBlock) -> Response {
    error_page(
        location.not_available_page(),
        StatusCode::Forbidden,
        Response::forbidden(),
    )
    .await
}

/// Serves a configured error page, degrading to the built-in body when
/// the page itself cannot be read.
async fn error_page(page: Option<&str>, status: StatusCode, fallback: Response) -> Response {
    if let Some(path) = page {
        if let Ok(body) = fs::read(path).await {
            return ResponseBuilder::new(status)
                .header("Content-Type", mime::content_type(path))
                .body(body)
                .build();
        }
    }
    fallback
}
