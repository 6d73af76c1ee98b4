/// A parsed value paired with a support flag.
///
/// Every field of a [`Request`] is stored this way. `supported == false`
/// means the value was extracted successfully but is not something this
/// server can act on (an unknown scheme, a script outside the CGI folder).
/// The value itself is always well-formed for its slot, so the response
/// layer can decide between rejecting and ignoring later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flagged<T> {
    pub value: T,
    pub supported: bool,
}

impl<T> Flagged<T> {
    /// Wraps a value the server can act on.
    pub fn supported(value: T) -> Self {
        Self {
            value,
            supported: true,
        }
    }

    /// Wraps a well-formed value the server declines to honor.
    pub fn unsupported(value: T) -> Self {
        Self {
            value,
            supported: false,
        }
    }
}

/// HTTP request methods.
///
/// The verb set this server recognizes. Anything else parses as `UNKNOWN`
/// and aborts the request with a 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// DELETE - Delete a resource
    DELETE,
    /// PUT - Replace a resource
    PUT,
    /// UNKNOWN - Anything outside the supported verb set
    UNKNOWN,
}

impl Method {
    /// Parses an HTTP method from a token.
    ///
    /// Case-sensitive, exact match against the supported verb set.
    ///
    /// # Example
    ///
    /// ```
    /// # use bastion::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_token("get"), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "DELETE" => Some(Method::DELETE),
            "PUT" => Some(Method::PUT),
            _ => None,
        }
    }

    /// Returns the method as its wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
            Method::PUT => "PUT",
            Method::UNKNOWN => "UNKNOWN",
        }
    }
}

/// A fully parsed HTTP request.
///
/// Every field carries its own support flag, so routing and response
/// generation have uniform access to "what was asked" and "can we serve it"
/// without the parser having to abort on the first irregularity.
///
/// Built fresh for each connection by [`crate::http::parser::parse_request`],
/// consumed by the handler, then dropped.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method; unsupported when outside the known verb set
    pub method: Flagged<Method>,
    /// URL scheme; only "http" is supported
    pub protocol: Flagged<String>,
    /// Host part of the URL, empty for origin-form requests
    pub domain: Flagged<String>,
    /// Port from the URL, overridable by the Host header
    pub port: Flagged<u16>,
    /// CGI script segment; supported only directly under /cgi/
    pub script: Flagged<String>,
    /// Request path, normalized to begin and end with '/'
    pub path: Flagged<String>,
    /// Query string without the leading '?'
    pub query: Flagged<String>,
    /// Fragment without the leading '#'
    pub fragment: Flagged<String>,
    /// HTTP version; supported only when exactly "HTTP/1.1"
    pub http_version: Flagged<String>,
    /// Header (name, value) pairs in wire order, duplicates retained
    pub headers: Vec<(Flagged<String>, Flagged<String>)>,
    /// Request body; supported iff non-empty
    pub body: Flagged<String>,
    /// True when path + script contain more than one '/'
    pub has_nested_path: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Flagged::unsupported(Method::UNKNOWN),
            protocol: Flagged::supported("http".to_string()),
            domain: Flagged::supported(String::new()),
            port: Flagged::supported(80),
            script: Flagged::unsupported(String::new()),
            path: Flagged::supported("/".to_string()),
            query: Flagged::unsupported(String::new()),
            fragment: Flagged::unsupported(String::new()),
            http_version: Flagged::supported("HTTP/1.1".to_string()),
            headers: Vec::new(),
            body: Flagged::unsupported(String::new()),
            has_nested_path: false,
        }
    }
}

impl Request {
    /// Retrieves a header value by name.
    ///
    /// Names are compared case-insensitively; when the same header appears
    /// more than once the last occurrence wins. Names are stored verbatim.
    pub fn find_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(name, _)| name.value.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.value.as_str())
    }

    /// Returns the Host header value, if the client sent one.
    pub fn host(&self) -> Option<&str> {
        self.find_header("Host")
    }

    /// The host name used for virtual-server matching: the Host header
    /// without its port part, falling back to the URL domain.
    pub fn host_name(&self) -> &str {
        match self.host() {
            Some(host) => host.split(':').next().unwrap_or(host),
            None => self.domain.value.as_str(),
        }
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.find_header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// Checks the Connection header. For HTTP/1.1, the default is `true`
    /// (keep-alive); Connection: close turns it off.
    pub fn keep_alive(&self) -> bool {
        self.find_header("Connection")
            .map(|v| v.eq_ignore_ascii_case("keep-alive"))
            .unwrap_or(true) // HTTP/1.1 default
    }
}
