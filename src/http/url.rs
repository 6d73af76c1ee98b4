//! URL decomposition.
//!
//! Splits the URL token of a request line into protocol, domain, port,
//! CGI script segment, path, query and fragment, normalizing as it goes.
//! Each step works on the remaining suffix of the token; nothing is
//! mutated in place.

use crate::http::parser::RequestError;
use crate::http::request::{Flagged, Request};

/// Collapses every run of consecutive slashes into a single slash.
///
/// Idempotent: applying it twice yields the same string as applying it once.
pub fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_slash = false;
    for c in s.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        out.push(c);
    }
    out
}

/// Splits an authority segment (`domain[:port]`) into its parts.
///
/// The port is everything between the first `:` and the end of the
/// segment. A `:` followed by anything that does not parse as a valid
/// port number is a hard protocol violation.
pub fn split_port(authority: &str) -> Result<(&str, Option<u16>), RequestError> {
    match authority.split_once(':') {
        None => Ok((authority, None)),
        Some((domain, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| RequestError::BadRequest)?;
            Ok((domain, Some(port)))
        }
    }
}

/// Decomposes the URL token into the request's URL-derived fields.
///
/// Extraction order: protocol, port, domain, fragment, query, script,
/// path. Consecutive slashes are collapsed up front; the scheme separator
/// is recognized before collapsing so `http://` survives intact.
///
/// The stored path always begins and ends with `/`, which makes it
/// directly comparable against location prefixes (those are always stored
/// with a trailing slash as well).
pub fn decompose(req: &mut Request, url: &str) -> Result<(), RequestError> {
    // Scheme, if any, sits before the first "://".
    let rest = match url.split_once("://") {
        Some((scheme, rest)) => {
            req.protocol = Flagged {
                value: scheme.to_string(),
                supported: scheme == "http",
            };
            rest
        }
        None => url,
    };

    let rest = collapse_slashes(rest);

    // The domain is everything before the first slash; a domain with no
    // path separator after it cannot be routed.
    let slash = match rest.find('/') {
        Some(pos) => pos,
        None => {
            req.domain = Flagged::unsupported(String::new());
            return Err(RequestError::BadRequest);
        }
    };
    let (domain, port) = split_port(&rest[..slash])?;
    req.domain = Flagged::supported(domain.to_string());
    if let Some(port) = port {
        req.port = Flagged::supported(port);
    }

    // The remainder keeps its leading slash.
    let mut rest = rest[slash..].to_string();

    // Fragment is stripped before query, so a '?' inside a fragment never
    // becomes a query separator.
    if let Some(pos) = rest.find('#') {
        req.fragment = Flagged::supported(rest[pos + 1..].to_string());
        rest.truncate(pos);
    }
    if let Some(pos) = rest.find('?') {
        req.query = Flagged::supported(rest[pos + 1..].to_string());
        rest.truncate(pos);
    }

    extract_script(req, &mut rest);

    // Extensionless paths get a trailing slash so they line up with
    // location prefixes.
    if !rest.ends_with('/') && !rest.contains('.') && !rest.contains('?') {
        rest.push('/');
    }
    req.path = Flagged::supported(rest);

    req.has_nested_path = count_slashes(&req.path.value) + count_slashes(&req.script.value) > 1;

    Ok(())
}

/// Detects a CGI script segment.
///
/// One rule, applied after query and fragment are gone: if the final path
/// component contains a `.`, that component is the script and is removed
/// from the path (the trailing slash stays). A dot in a non-final
/// component does not create a script. The script is supported only when
/// it sits directly in the top-level `cgi` directory.
fn extract_script(req: &mut Request, rest: &mut String) {
    if !rest.contains('.') {
        return;
    }
    let Some(last_slash) = rest.rfind('/') else {
        return;
    };
    let component = &rest[last_slash + 1..];
    if !component.contains('.') {
        return;
    }
    let in_cgi_dir = &rest[..last_slash + 1] == "/cgi/";
    req.script = Flagged {
        value: component.to_string(),
        supported: in_cgi_dir,
    };
    rest.truncate(last_slash + 1);
}

fn count_slashes(s: &str) -> usize {
    s.chars().filter(|&c| c == '/').count()
}
