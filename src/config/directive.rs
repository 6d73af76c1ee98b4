//! Directive classification.
//!
//! A directive is one `key value...` entry of the configuration file.
//! Classification turns the raw pair into a typed, validated
//! [`DirectiveKind`] and enforces where each kind may appear: `listen` and
//! `server_name` only directly inside a `server` block, everything
//! route-scoped only inside a `location` block.

use crate::config::error::ConfigError;
use crate::http::request::Method;

/// The typed payload of a classified directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Ordered index filenames, first match wins
    Index(Vec<String>),
    /// Virtual-server names, order is matching priority
    ServerName(Vec<String>),
    /// Validated listen ports
    Listen(Vec<u16>),
    /// Location prefix; opens a nested block
    Location(String),
    /// Document root of a location
    Root(String),
    /// Allowed HTTP verbs for a location
    Methods(Vec<Method>),
    /// Path of the CGI interpreter; existence is checked at use, not here
    CgiPath(String),
    /// File ending handled by the CGI interpreter
    CgiFileEnding(String),
    /// Maximum POST body size in megabytes
    PostMaxSize(u64),
    /// Error page shown for missing resources
    NotFoundPage(String),
    /// Error page shown for internal failures
    GeneralErrorPage(String),
    /// Error page shown for refused resources
    NotAvailablePage(String),
    /// Redirection target, a path or an absolute URL
    Redirection(String),
    /// Directory listing toggle
    DirectoryListing(bool),
}

/// One classified configuration entry.
///
/// Keeps the raw key/value alongside the typed payload and the source
/// line for diagnostics. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
    pub line: usize,
    pub kind: DirectiveKind,
}

/// Classifies one `(key, value)` pair in its block context.
///
/// Fails when the key is unknown, the value fails its type-specific
/// validation, or the directive is not legal at the current nesting
/// level. The error carries the offending line.
pub fn classify(
    key: &str,
    value: &str,
    inside_location: bool,
    line: usize,
) -> Result<Directive, ConfigError> {
    let value = value.trim();
    let kind = match key {
        "listen" => {
            server_scope(key, inside_location, line)?;
            DirectiveKind::Listen(parse_ports(value, line)?)
        }
        "server_name" => {
            server_scope(key, inside_location, line)?;
            DirectiveKind::ServerName(parse_tokens(key, value, line)?)
        }
        "location" => {
            server_scope(key, inside_location, line)?;
            DirectiveKind::Location(parse_path_token(key, value, line)?)
        }
        "index" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::Index(parse_tokens(key, value, line)?)
        }
        "root" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::Root(parse_path_token(key, value, line)?)
        }
        "methods" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::Methods(parse_methods(value, line)?)
        }
        "cgi_path" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::CgiPath(parse_path_token(key, value, line)?)
        }
        "cgi_fileending" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::CgiFileEnding(parse_file_ending(value, line)?)
        }
        "post_max_size" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::PostMaxSize(parse_post_max_size(value, line)?)
        }
        "not_found_error_page" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::NotFoundPage(parse_path_token(key, value, line)?)
        }
        "general_error_page" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::GeneralErrorPage(parse_path_token(key, value, line)?)
        }
        "not_available_page" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::NotAvailablePage(parse_path_token(key, value, line)?)
        }
        "redirection" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::Redirection(parse_redirection(value, line)?)
        }
        "directory_listing" => {
            location_scope(key, inside_location, line)?;
            DirectiveKind::DirectoryListing(parse_on_off(value, line)?)
        }
        _ => {
            return Err(ConfigError::new(
                line,
                format!("unknown directive '{key}'"),
            ));
        }
    };
    Ok(Directive {
        key: key.to_string(),
        value: value.to_string(),
        line,
        kind,
    })
}

fn server_scope(key: &str, inside_location: bool, line: usize) -> Result<(), ConfigError> {
    if inside_location {
        return Err(ConfigError::new(
            line,
            format!("'{key}' is not allowed inside a location block"),
        ));
    }
    Ok(())
}

fn location_scope(key: &str, inside_location: bool, line: usize) -> Result<(), ConfigError> {
    if !inside_location {
        return Err(ConfigError::new(
            line,
            format!("'{key}' is only allowed inside a location block"),
        ));
    }
    Ok(())
}

/// One or more whitespace-separated ports, each in [1, 65535].
fn parse_ports(value: &str, line: usize) -> Result<Vec<u16>, ConfigError> {
    let mut ports = Vec::new();
    for token in value.split_whitespace() {
        let port = token
            .parse::<u32>()
            .ok()
            .filter(|p| (1..=65535).contains(p))
            .ok_or_else(|| ConfigError::new(line, format!("invalid port '{token}'")))?;
        ports.push(port as u16);
    }
    if ports.is_empty() {
        return Err(ConfigError::new(line, "listen requires at least one port"));
    }
    Ok(ports)
}

/// One or more whitespace-separated tokens, stored in given order.
fn parse_tokens(key: &str, value: &str, line: usize) -> Result<Vec<String>, ConfigError> {
    let tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        return Err(ConfigError::new(
            line,
            format!("'{key}' requires at least one value"),
        ));
    }
    Ok(tokens)
}

/// Exactly one path token.
fn parse_path_token(key: &str, value: &str, line: usize) -> Result<String, ConfigError> {
    let mut tokens = value.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(path), None) => Ok(path.to_string()),
        _ => Err(ConfigError::new(
            line,
            format!("'{key}' requires exactly one path"),
        )),
    }
}

/// Whitespace-separated verbs, each from the fixed allowed set.
fn parse_methods(value: &str, line: usize) -> Result<Vec<Method>, ConfigError> {
    let mut methods = Vec::new();
    for token in value.split_whitespace() {
        let method = Method::from_token(token)
            .ok_or_else(|| ConfigError::new(line, format!("unsupported method '{token}'")))?;
        methods.push(method);
    }
    if methods.is_empty() {
        return Err(ConfigError::new(
            line,
            "methods requires at least one verb",
        ));
    }
    Ok(methods)
}

/// A dot followed by at least one non-whitespace character.
fn parse_file_ending(value: &str, line: usize) -> Result<String, ConfigError> {
    let valid = value.starts_with('.') && value[1..].chars().any(|c| !c.is_whitespace());
    if !valid {
        return Err(ConfigError::new(
            line,
            format!("invalid cgi_fileending '{value}'"),
        ));
    }
    Ok(value.to_string())
}

/// All-digit value, interpreted as megabytes.
fn parse_post_max_size(value: &str, line: usize) -> Result<u64, ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::new(
            line,
            format!("post_max_size must be a number, got '{value}'"),
        ));
    }
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::new(line, format!("post_max_size '{value}' is out of range")))
}

/// A non-empty target; absolute URLs must parse as such.
fn parse_redirection(value: &str, line: usize) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::new(line, "redirection requires a target"));
    }
    if value.contains("://") && url::Url::parse(value).is_err() {
        return Err(ConfigError::new(
            line,
            format!("invalid redirection target '{value}'"),
        ));
    }
    Ok(value.to_string())
}

/// The literal `on` or `off`.
fn parse_on_off(value: &str, line: usize) -> Result<bool, ConfigError> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ConfigError::new(
            line,
            format!("directory_listing must be 'on' or 'off', got '{value}'"),
        )),
    }
}
