//! Request parsing.
//!
//! Turns one complete request text into a [`Request`], consuming the input
//! through an advancing cursor. Extraction order is fixed: method, URL,
//! HTTP version, headers, body. Each step leaves the cursor at the start
//! of the next piece, so the steps are not reorderable.

use crate::http::request::{Flagged, Method, Request};
use crate::http::url;

/// Hard protocol violations that abort the parse of one request.
///
/// These never take the whole server down; the connection layer turns
/// them into an error response and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Structurally unparseable request
    BadRequest,
    /// Method outside the supported verb set
    MethodNotAllowed,
    /// A hard rule was violated (GET with a body)
    Forbidden,
}

/// Parses a complete HTTP request.
///
/// Soft irregularities (unknown scheme, version other than HTTP/1.1) are
/// recorded in the affected field's support flag; only the violations in
/// [`RequestError`] abort the parse.
pub fn parse_request(raw: &str) -> Result<Request, RequestError> {
    if raw.is_empty() {
        return Err(RequestError::BadRequest);
    }

    let mut req = Request::default();
    let mut rest = raw;

    parse_method(&mut req, &mut rest)?;
    let url_token = take_token(&mut rest)?;
    url::decompose(&mut req, url_token)?;
    parse_version(&mut req, &mut rest);
    parse_headers(&mut req, &mut rest)?;
    parse_body(&mut req, rest)?;

    Ok(req)
}

/// Takes the text up to the next space and advances past the separator.
fn take_token<'a>(rest: &mut &'a str) -> Result<&'a str, RequestError> {
    let pos = rest.find(' ').ok_or(RequestError::BadRequest)?;
    let token = &rest[..pos];
    *rest = &rest[pos + 1..];
    Ok(token)
}

/// Takes the text up to the next line ending, consuming the ending.
///
/// Accepts both CRLF and bare LF; the CR is not part of the returned line.
fn take_line<'a>(rest: &mut &'a str) -> &'a str {
    let line = match rest.find('\n') {
        Some(pos) => {
            let line = &rest[..pos];
            *rest = &rest[pos + 1..];
            line
        }
        None => {
            let line = *rest;
            *rest = "";
            line
        }
    };
    line.strip_suffix('\r').unwrap_or(line)
}

/// Recognizes the method token.
///
/// No match is a hard stop for the whole parse, not a soft flag: the
/// method field still records UNKNOWN/unsupported before aborting.
fn parse_method(req: &mut Request, rest: &mut &str) -> Result<(), RequestError> {
    let token = take_token(rest)?;
    match Method::from_token(token) {
        Some(method) => {
            req.method = Flagged::supported(method);
            Ok(())
        }
        None => {
            req.method = Flagged::unsupported(Method::UNKNOWN);
            Err(RequestError::MethodNotAllowed)
        }
    }
}

/// Consumes the rest of the request line as the HTTP version.
fn parse_version(req: &mut Request, rest: &mut &str) {
    let line = take_line(rest);
    req.http_version = Flagged {
        value: line.to_string(),
        supported: line == "HTTP/1.1",
    };
}

/// Accumulates header lines until the blank line ending the header block.
///
/// Each line splits at its first ':'; the name is stored verbatim, the
/// value whitespace-trimmed. A line without a separator is retained but
/// flagged unsupported rather than rejected. Because headers are consumed
/// line by line up to the blank line, a ':' in the body is never taken
/// for a header separator.
fn parse_headers(req: &mut Request, rest: &mut &str) -> Result<(), RequestError> {
    while !rest.is_empty() {
        let line = take_line(rest);
        if line.is_empty() {
            break;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                let name = name.to_string();
                let value = value.trim().to_string();
                check_header(req, &name, &value)?;
                req.headers
                    .push((Flagged::supported(name), Flagged::supported(value)));
            }
            None => {
                req.headers.push((
                    Flagged::unsupported(line.to_string()),
                    Flagged::unsupported(String::new()),
                ));
            }
        }
    }
    Ok(())
}

/// Cross-field rules applied as each header is ingested.
///
/// A Host header's value goes back through slash normalization and port
/// extraction and overrides the URL-derived port. Content-Length is only
/// legal on methods that may carry a body; on any other method it forces
/// the method's support flag off (soft failure, the parse continues).
fn check_header(req: &mut Request, name: &str, value: &str) -> Result<(), RequestError> {
    if name.eq_ignore_ascii_case("Host") {
        let host = url::collapse_slashes(value);
        let authority = host.split('/').next().unwrap_or("");
        let (_, port) = url::split_port(authority)?;
        if let Some(port) = port {
            req.port = Flagged::supported(port);
        }
    }
    if name.eq_ignore_ascii_case("Content-Length")
        && !matches!(req.method.value, Method::POST | Method::DELETE)
    {
        req.method.supported = false;
    }
    Ok(())
}

/// Stores whatever remains after the header block as the body.
///
/// GET requests must not carry one; a non-empty remainder on GET marks
/// the method unsupported and aborts with Forbidden.
fn parse_body(req: &mut Request, rest: &str) -> Result<(), RequestError> {
    if rest.is_empty() {
        return Ok(());
    }
    if req.method.value == Method::GET {
        req.method.supported = false;
        return Err(RequestError::Forbidden);
    }
    req.body = Flagged::supported(rest.to_string());
    Ok(())
}
