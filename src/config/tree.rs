//! Configuration tree building.
//!
//! Strips comments, walks the file line by line and assembles the
//! `server { location <path> { ... } }` structure with an explicit
//! nesting stack. Any structural or classification failure is fatal:
//! the server never starts on a partially valid configuration.

use crate::config::directive::{classify, Directive, DirectiveKind};
use crate::config::error::ConfigError;
use crate::http::request::Method;

/// One virtual server: its listen ports, names and location routes.
///
/// Built once at startup, then shared read-only for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerBlock {
    pub ports: Vec<u16>,
    pub server_names: Vec<String>,
    pub locations: Vec<LocationBlock>,
}

impl ServerBlock {
    pub fn listens_on(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.server_names.iter().any(|n| n == name)
    }
}

/// A URL-prefix-scoped directive collection nested in a server block.
///
/// The prefix always ends with a slash, so request paths (normalized the
/// same way) can be compared against it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationBlock {
    pub path: String,
    pub directives: Vec<Directive>,
}

impl LocationBlock {
    fn new(mut path: String) -> Self {
        if !path.ends_with('/') {
            path.push('/');
        }
        Self {
            path,
            directives: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::Root(root) => Some(root.as_str()),
            _ => None,
        })
    }

    /// Index filenames in priority order, if an index directive is set.
    pub fn indexes(&self) -> Option<&[String]> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::Index(names) => Some(names.as_slice()),
            _ => None,
        })
    }

    /// Whether a verb is allowed here. Without a methods directive every
    /// supported verb is allowed.
    pub fn allows_method(&self, method: Method) -> bool {
        self.directives
            .iter()
            .find_map(|d| match &d.kind {
                DirectiveKind::Methods(methods) => Some(methods.contains(&method)),
                _ => None,
            })
            .unwrap_or(true)
    }

    pub fn cgi_path(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::CgiPath(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn cgi_file_ending(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::CgiFileEnding(ending) => Some(ending.as_str()),
            _ => None,
        })
    }

    pub fn post_max_size(&self) -> Option<u64> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::PostMaxSize(mb) => Some(*mb),
            _ => None,
        })
    }

    pub fn redirection(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::Redirection(target) => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn directory_listing(&self) -> bool {
        self.directives
            .iter()
            .find_map(|d| match &d.kind {
                DirectiveKind::DirectoryListing(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn not_found_page(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::NotFoundPage(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn general_error_page(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::GeneralErrorPage(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn not_available_page(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match &d.kind {
            DirectiveKind::NotAvailablePage(path) => Some(path.as_str()),
            _ => None,
        })
    }
}

/// Removes the comment part of a line.
///
/// A line whose first character is `#` is dropped entirely; otherwise
/// everything from the first `#` to the end of the line goes.
fn strip_comment(line: &str) -> &str {
    if line.starts_with('#') {
        return "";
    }
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Splits a line on its first whitespace run into key and remainder.
fn split_key_value(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((key, value)) => (key, value.trim()),
        None => (line, ""),
    }
}

/// Compiles the configuration text into the server tree.
///
/// Comments are stripped first; line numbers refer to the original file.
/// Block structure is tracked with an explicit stack of open frames:
/// `server {` pushes a server frame, `location <path> {` pushes a
/// location frame inside it, `}` pops. Classification errors propagate
/// with their line number unchanged.
pub fn build(text: &str) -> Result<Vec<ServerBlock>, ConfigError> {
    let mut servers: Vec<ServerBlock> = Vec::new();
    let mut open_server: Option<ServerBlock> = None;
    let mut open_location: Option<LocationBlock> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if line == "}" {
            if let Some(location) = open_location.take() {
                match open_server.as_mut() {
                    Some(server) => server.locations.push(location),
                    None => {
                        return Err(ConfigError::new(line_no, "unexpected closing brace"));
                    }
                }
            } else if let Some(server) = open_server.take() {
                servers.push(server);
            } else {
                return Err(ConfigError::new(line_no, "unexpected closing brace"));
            }
            continue;
        }

        if let Some(head) = line.strip_suffix('{') {
            open_block(
                head.trim(),
                line_no,
                &mut open_server,
                &mut open_location,
            )?;
            continue;
        }

        let (key, value) = split_key_value(line);
        if open_server.is_none() {
            return Err(ConfigError::new(
                line_no,
                format!("directive '{key}' outside of a server block"),
            ));
        }
        let directive = classify(key, value, open_location.is_some(), line_no)?;

        if let Some(location) = open_location.as_mut() {
            location.directives.push(directive);
        } else if let Some(server) = open_server.as_mut() {
            match directive.kind {
                DirectiveKind::Listen(ports) => server.ports.extend(ports),
                DirectiveKind::ServerName(names) => server.server_names.extend(names),
                DirectiveKind::Location(_) => {
                    return Err(ConfigError::new(
                        line_no,
                        "location requires an opening brace",
                    ));
                }
                _ => {
                    return Err(ConfigError::new(
                        line_no,
                        format!("'{key}' is only allowed inside a location block"),
                    ));
                }
            }
        }
    }

    if open_location.is_some() || open_server.is_some() {
        return Err(ConfigError::new(
            text.lines().count(),
            "configuration ends inside an unclosed block",
        ));
    }

    Ok(servers)
}

/// Handles a line ending in `{`: either a server start marker or a
/// location opening. The `server` marker itself never becomes a
/// directive in the final tree.
fn open_block(
    head: &str,
    line_no: usize,
    open_server: &mut Option<ServerBlock>,
    open_location: &mut Option<LocationBlock>,
) -> Result<(), ConfigError> {
    let (key, value) = split_key_value(head);
    match key {
        "server" if value.is_empty() => {
            if open_server.is_some() {
                return Err(ConfigError::new(line_no, "server blocks cannot be nested"));
            }
            *open_server = Some(ServerBlock::default());
            Ok(())
        }
        "location" => {
            if open_server.is_none() {
                return Err(ConfigError::new(
                    line_no,
                    "location block outside of a server block",
                ));
            }
            if open_location.is_some() {
                return Err(ConfigError::new(
                    line_no,
                    "location blocks cannot be nested",
                ));
            }
            let directive = classify(key, value, false, line_no)?;
            match directive.kind {
                DirectiveKind::Location(path) => {
                    *open_location = Some(LocationBlock::new(path));
                    Ok(())
                }
                _ => Err(ConfigError::new(line_no, "invalid location block")),
            }
        }
        _ => Err(ConfigError::new(
            line_no,
            format!("unexpected block '{head}'"),
        )),
    }
}
